//! The four diagnostic categories exposed to hosts.
//!
//! Each category has a stable check id and exactly one positional message
//! template. `{0}` is the declared reference label; the package template also
//! takes `{1}`, the (possibly empty) caveat qualifier.

use crate::ids;

/// Suffix appended to package diagnostics classified as removable-with-caveat.
pub const TRANSITIVE_CAVEAT: &str = " (though a dependent package may still use it transitively)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCategory {
    DocGeneration,
    DirectReference,
    ModuleReference,
    PackageReference,
}

impl DiagnosticCategory {
    pub const ALL: [DiagnosticCategory; 4] = [
        DiagnosticCategory::DocGeneration,
        DiagnosticCategory::DirectReference,
        DiagnosticCategory::ModuleReference,
        DiagnosticCategory::PackageReference,
    ];

    pub fn check_id(self) -> &'static str {
        match self {
            DiagnosticCategory::DocGeneration => ids::CHECK_REFS_DOC_GENERATION,
            DiagnosticCategory::DirectReference => ids::CHECK_REFS_DIRECT_REFERENCE,
            DiagnosticCategory::ModuleReference => ids::CHECK_REFS_MODULE_REFERENCE,
            DiagnosticCategory::PackageReference => ids::CHECK_REFS_PACKAGE_REFERENCE,
        }
    }

    pub fn from_check_id(check_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.check_id() == check_id)
    }

    pub fn template(self) -> &'static str {
        match self {
            DiagnosticCategory::DocGeneration => {
                "Enable documentation generation for accurate detection of used references"
            }
            DiagnosticCategory::DirectReference => "Reference {0} can be removed",
            DiagnosticCategory::ModuleReference => "Module reference {0} can be removed",
            DiagnosticCategory::PackageReference => "Package reference {0} can be removed{1}",
        }
    }

    /// Substitute positional arguments into the category template.
    ///
    /// Missing arguments are substituted with an empty string so the output never
    /// leaks a raw `{n}` placeholder.
    pub fn format(self, args: &[&str]) -> String {
        let template = self.template();
        let mut out = String::with_capacity(template.len() + 32);
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => match after[..close].parse::<usize>() {
                    Ok(idx) => {
                        out.push_str(args.get(idx).copied().unwrap_or(""));
                        rest = &after[close + 1..];
                    }
                    Err(_) => {
                        out.push('{');
                        rest = after;
                    }
                },
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
