//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after project file examples.
    pub examples: ExamplePair,
}

/// Before and after project file examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Project content that would trigger a finding.
    pub before: &'static str,
    /// Project content that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_REFS_DOC_GENERATION => Some(explain_doc_generation()),
        ids::CHECK_REFS_DIRECT_REFERENCE => Some(explain_direct_reference()),
        ids::CHECK_REFS_MODULE_REFERENCE => Some(explain_module_reference()),
        ids::CHECK_REFS_PACKAGE_REFERENCE => Some(explain_package_reference()),
        ids::CHECK_TOOL_RUNTIME => Some(explain_tool_runtime()),

        // Codes
        ids::CODE_DOC_GENERATION_DISABLED => Some(explain_doc_generation()),
        ids::CODE_REFERENCE_REMOVABLE => Some(explain_direct_reference()),
        ids::CODE_MODULE_REFERENCE_REMOVABLE => Some(explain_module_reference()),
        ids::CODE_PACKAGE_REFERENCE_REMOVABLE => Some(explain_package_reference()),
        ids::CODE_PACKAGE_REFERENCE_USED_TRANSITIVELY => {
            Some(explain_package_used_transitively())
        }
        ids::CODE_RUNTIME_ERROR => Some(explain_tool_runtime()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_REFS_DOC_GENERATION,
        ids::CHECK_REFS_DIRECT_REFERENCE,
        ids::CHECK_REFS_MODULE_REFERENCE,
        ids::CHECK_REFS_PACKAGE_REFERENCE,
        ids::CHECK_TOOL_RUNTIME,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_DOC_GENERATION_DISABLED,
        ids::CODE_REFERENCE_REMOVABLE,
        ids::CODE_MODULE_REFERENCE_REMOVABLE,
        ids::CODE_PACKAGE_REFERENCE_REMOVABLE,
        ids::CODE_PACKAGE_REFERENCE_USED_TRANSITIVELY,
        ids::CODE_RUNTIME_ERROR,
    ]
}

// --- Check-level explanations ---

fn explain_doc_generation() -> Explanation {
    Explanation {
        title: "Documentation Generation Disabled",
        description: "\
Reported when the analyzed project does not generate XML documentation.

The compiler only binds symbols inside documentation comments (`<see cref=\"...\"/>`)
when documentation generation is on. With it off, a reference that is used only
from doc comments looks unused, and the other checks may report it as removable.",
        remediation: "\
Turn on documentation generation for the project. If you do not want the XML file
or the missing-comment warnings, suppress them instead of disabling generation:

    <GenerateDocumentationFile>true</GenerateDocumentationFile>
    <NoWarn>$(NoWarn);CS1591</NoWarn>",
        examples: ExamplePair {
            before: r#"<PropertyGroup>
  <TargetFramework>net8.0</TargetFramework>
</PropertyGroup>"#,
            after: r#"<PropertyGroup>
  <TargetFramework>net8.0</TargetFramework>
  <GenerateDocumentationFile>true</GenerateDocumentationFile>
  <NoWarn>$(NoWarn);CS1591</NoWarn>
</PropertyGroup>"#,
        },
    }
}

fn explain_direct_reference() -> Explanation {
    Explanation {
        title: "Removable Direct Reference",
        description: "\
Detects direct assembly references (`<Reference>`) whose assembly the compiler
did not use while building the project.

Unused references slow down builds, widen the set of files that invalidate
incremental builds, and hide the real dependency structure of the codebase.
Platform-provided references (for example `mscorlib` or `netstandard`) are never
reported.",
        remediation: "\
Remove the `<Reference>` item from the project file. If the assembly is needed
for a reason the compiler cannot see (reflection, runtime loading), keep it and
add its name to the allowlist of `refs.direct_reference` in `reftrim.toml`.",
        examples: ExamplePair {
            before: r#"<ItemGroup>
  <Reference Include="System.Xml" />
  <Reference Include="Legacy.Interop">
    <HintPath>..\lib\Legacy.Interop.dll</HintPath>
  </Reference>
</ItemGroup>"#,
            after: r#"<ItemGroup>
  <Reference Include="System.Xml" />
</ItemGroup>"#,
        },
    }
}

fn explain_module_reference() -> Explanation {
    Explanation {
        title: "Removable Module Reference",
        description: "\
Detects project-to-project references (`<ProjectReference>`) whose output assembly
the compiler did not use.

A module reference whose output cannot be determined (missing file, no output
path) is treated as used, so this check never guesses.",
        remediation: "\
Remove the `<ProjectReference>` item. If the referenced project must still build
first (for example it produces a tool or content), reference it with
`ReferenceOutputAssembly=\"false\"` instead.",
        examples: ExamplePair {
            before: r#"<ItemGroup>
  <ProjectReference Include="..\Shared\Shared.csproj" />
  <ProjectReference Include="..\Unused\Unused.csproj" />
</ItemGroup>"#,
            after: r#"<ItemGroup>
  <ProjectReference Include="..\Shared\Shared.csproj" />
</ItemGroup>"#,
        },
    }
}

fn explain_package_reference() -> Explanation {
    Explanation {
        title: "Removable Package Reference",
        description: "\
Detects package references (`<PackageReference>`) none of whose compile-time
assemblies are used, neither directly nor through packages that depend on it.

Packages that ship build logic (`build/`, `buildTransitive/` or
`buildMultiTargeting/` files) and packages that contribute no compile-time
assemblies are never reported, since their necessity cannot be inferred from
assembly usage.",
        remediation: "\
Remove the `<PackageReference>` item and restore. If the package is needed at
runtime only, consider `IncludeAssets=\"runtime\"`; otherwise allowlist it under
`refs.package_reference` in `reftrim.toml`.",
        examples: ExamplePair {
            before: r#"<ItemGroup>
  <PackageReference Include="Newtonsoft.Json" Version="13.0.3" />
  <PackageReference Include="Humanizer.Core" Version="2.14.1" />
</ItemGroup>"#,
            after: r#"<ItemGroup>
  <PackageReference Include="Newtonsoft.Json" Version="13.0.3" />
</ItemGroup>"#,
        },
    }
}

fn explain_tool_runtime() -> Explanation {
    Explanation {
        title: "Reftrim Runtime Error",
        description: "\
Reported when reftrim could not analyze the project: a declared reference file
line could not be parsed, the lock manifest is inconsistent with the package
folders on disk, assembly metadata could not be read, or an internal invariant
failed. No reference is reported as removable for that project.",
        remediation: "\
Read the message for the failing input. Re-running restore usually fixes a stale
lock manifest. Report internal invariant failures together with the message.",
        examples: ExamplePair {
            before: r#"<!-- obj/project.assets.json lists a package
     whose folder was deleted from the package cache -->"#,
            after: r#"<!-- dotnet restore repopulated the package cache -->"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_package_used_transitively() -> Explanation {
    let mut exp = explain_package_reference();
    exp.title = "Package Reference Used Only Transitively";
    exp.description = "\
Reported for a package reference whose own compile-time assemblies are unused,
while assemblies of a package that depends on it are used.

Removing the reference is often safe, because the dependent package brings it in
again. It is reported separately because removing it may change which version is
resolved, or break a dependent package that relies on this one being present.";
    exp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_check_id() {
        assert!(lookup_explanation(ids::CHECK_REFS_DOC_GENERATION).is_some());
        assert!(lookup_explanation(ids::CHECK_REFS_DIRECT_REFERENCE).is_some());
        assert!(lookup_explanation(ids::CHECK_REFS_MODULE_REFERENCE).is_some());
        assert!(lookup_explanation(ids::CHECK_REFS_PACKAGE_REFERENCE).is_some());
    }

    #[test]
    fn lookup_by_code() {
        assert!(lookup_explanation(ids::CODE_REFERENCE_REMOVABLE).is_some());
        assert!(lookup_explanation(ids::CODE_PACKAGE_REFERENCE_USED_TRANSITIVELY).is_some());
        assert!(lookup_explanation(ids::CODE_RUNTIME_ERROR).is_some());
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("unknown.check").is_none());
        assert!(lookup_explanation("unknown_code").is_none());
    }

    #[test]
    fn transitive_code_has_its_own_title() {
        let exp = lookup_explanation(ids::CODE_PACKAGE_REFERENCE_USED_TRANSITIVELY)
            .expect("registered");
        assert_eq!(exp.title, "Package Reference Used Only Transitively");
    }

    #[test]
    fn all_check_ids_are_valid() {
        for id in all_check_ids() {
            assert!(
                lookup_explanation(id).is_some(),
                "check_id {} should be in registry",
                id
            );
        }
    }

    #[test]
    fn all_codes_are_valid() {
        for code in all_codes() {
            assert!(
                lookup_explanation(code).is_some(),
                "code {} should be in registry",
                code
            );
        }
    }
}
