use reftrim_domain::policy::{CheckPolicy, EffectiveConfig};
use reftrim_types::{DiagnosticCategory, Severity, ids};
use std::collections::BTreeMap;

/// Reference assemblies every managed project gets from the target framework.
/// Matched exactly against the simple assembly name: packages named `System.*`
/// (System.Reactive, System.Data.SQLite) are ordinary references.
pub const DEFAULT_IMPLICIT_REFERENCES: &[&str] = &[
    "mscorlib",
    "netstandard",
    "System",
    "System.ComponentModel.DataAnnotations",
    "System.Configuration",
    "System.Core",
    "System.Data",
    "System.Data.DataSetExtensions",
    "System.Drawing",
    "System.IO.Compression",
    "System.IO.Compression.FileSystem",
    "System.Net.Http",
    "System.Numerics",
    "System.Runtime",
    "System.Runtime.Serialization",
    "System.ServiceModel",
    "System.Transactions",
    "System.Web",
    "System.Windows.Forms",
    "System.Xaml",
    "System.Xml",
    "System.Xml.Linq",
    "Microsoft.CSharp",
    "Microsoft.VisualBasic",
    "PresentationCore",
    "PresentationFramework",
    "WindowsBase",
];

/// Names of the built-in profiles, in display order.
pub const PROFILES: &[&str] = &["default", "quiet"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "quiet" => quiet_profile(),
        // default
        _ => default_profile(),
    }
}

fn default_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "default".to_string(),
        max_findings: 200,
        checks: all_checks(Severity::Warning),
        implicit_references: implicit_defaults(),
    }
}

fn quiet_profile() -> EffectiveConfig {
    // Everything informational, no doc-generation hint.
    let mut checks = all_checks(Severity::Info);
    checks.insert(
        ids::CHECK_REFS_DOC_GENERATION.to_string(),
        CheckPolicy::disabled(),
    );
    EffectiveConfig {
        profile: "quiet".to_string(),
        max_findings: 200,
        checks,
        implicit_references: implicit_defaults(),
    }
}

fn all_checks(severity: Severity) -> BTreeMap<String, CheckPolicy> {
    DiagnosticCategory::ALL
        .into_iter()
        .map(|c| (c.check_id().to_string(), CheckPolicy::enabled(severity)))
        .collect()
}

fn implicit_defaults() -> Vec<String> {
    DEFAULT_IMPLICIT_REFERENCES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
