//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks (one per diagnostic category)
pub const CHECK_REFS_DOC_GENERATION: &str = "refs.doc_generation";
pub const CHECK_REFS_DIRECT_REFERENCE: &str = "refs.direct_reference";
pub const CHECK_REFS_MODULE_REFERENCE: &str = "refs.module_reference";
pub const CHECK_REFS_PACKAGE_REFERENCE: &str = "refs.package_reference";

// Codes: refs.doc_generation
pub const CODE_DOC_GENERATION_DISABLED: &str = "doc_generation_disabled";

// Codes: refs.direct_reference
pub const CODE_REFERENCE_REMOVABLE: &str = "reference_removable";

// Codes: refs.module_reference
pub const CODE_MODULE_REFERENCE_REMOVABLE: &str = "module_reference_removable";

// Codes: refs.package_reference
pub const CODE_PACKAGE_REFERENCE_REMOVABLE: &str = "package_reference_removable";
pub const CODE_PACKAGE_REFERENCE_USED_TRANSITIVELY: &str = "package_reference_used_transitively";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";

// Verdict reasons
pub const REASON_TOOL_ERROR: &str = "tool_error";
pub const REASON_LOCK_MANIFEST_MISSING: &str = "lock_manifest_missing";
pub const REASON_USED_MODULES_MISSING: &str = "used_modules_missing";
pub const REASON_DECLARED_REFERENCES_MISSING: &str = "declared_references_missing";
pub const REASON_TRUNCATED: &str = "truncated";
