//! The `explain` use case: registry text plus how reftrim reports each topic.

use reftrim_domain::classify::Classification;
use reftrim_types::category::TRANSITIVE_CAVEAT;
use reftrim_types::explain::{self, Explanation};
use reftrim_types::{Severity, ids};

/// What a finding code says about the reference it names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeOutcome {
    /// Reported for a reference in this classification.
    Reference(Classification),
    /// Project-level hint that does not name a reference.
    Advisory,
    /// The analysis itself failed.
    ToolFailure,
}

impl CodeOutcome {
    fn describe(self) -> &'static str {
        match self {
            CodeOutcome::Reference(c) => c.as_str(),
            CodeOutcome::Advisory => "advisory",
            CodeOutcome::ToolFailure => "tool_failure",
        }
    }
}

/// `(code, check_id, outcome)` for every code reftrim can emit.
const CODES: &[(&str, &str, CodeOutcome)] = &[
    (
        ids::CODE_DOC_GENERATION_DISABLED,
        ids::CHECK_REFS_DOC_GENERATION,
        CodeOutcome::Advisory,
    ),
    (
        ids::CODE_REFERENCE_REMOVABLE,
        ids::CHECK_REFS_DIRECT_REFERENCE,
        CodeOutcome::Reference(Classification::Removable),
    ),
    (
        ids::CODE_MODULE_REFERENCE_REMOVABLE,
        ids::CHECK_REFS_MODULE_REFERENCE,
        CodeOutcome::Reference(Classification::Removable),
    ),
    (
        ids::CODE_PACKAGE_REFERENCE_REMOVABLE,
        ids::CHECK_REFS_PACKAGE_REFERENCE,
        CodeOutcome::Reference(Classification::Removable),
    ),
    (
        ids::CODE_PACKAGE_REFERENCE_USED_TRANSITIVELY,
        ids::CHECK_REFS_PACKAGE_REFERENCE,
        CodeOutcome::Reference(Classification::RemovableWithCaveat),
    ),
    (ids::CODE_RUNTIME_ERROR, ids::CHECK_TOOL_RUNTIME, CodeOutcome::ToolFailure),
];

/// A resolved explain topic.
#[derive(Clone, Debug)]
pub struct ExplainTopic {
    pub explanation: Explanation,
    pub check_id: &'static str,
    /// Codes covered by the topic: just the one asked about, or every code of a check.
    pub codes: Vec<(&'static str, CodeOutcome)>,
    /// Severity in each built-in profile; `None` where the check is off.
    pub profiles: Vec<(&'static str, Option<Severity>)>,
}

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Box<ExplainTopic>),
    /// Unknown identifier, with known identifiers that contain it.
    NotFound {
        identifier: String,
        suggestions: Vec<&'static str>,
    },
}

/// Look up a check_id or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    let Some(explanation) = explain::lookup_explanation(identifier) else {
        return ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            suggestions: suggest(identifier),
        };
    };

    let (check_id, codes) = match CODES.iter().find(|(code, _, _)| *code == identifier) {
        Some(&(code, check_id, outcome)) => (check_id, vec![(code, outcome)]),
        None => {
            let codes = CODES
                .iter()
                .filter(|(_, check_id, _)| *check_id == identifier)
                .map(|&(code, _, outcome)| (code, outcome))
                .collect();
            let check_id = explain::all_check_ids()
                .iter()
                .copied()
                .find(|id| *id == identifier)
                .unwrap_or(ids::CHECK_TOOL_RUNTIME);
            (check_id, codes)
        }
    };

    ExplainOutput::Found(Box::new(ExplainTopic {
        explanation,
        check_id,
        codes,
        profiles: profile_severities(check_id),
    }))
}

fn profile_severities(check_id: &str) -> Vec<(&'static str, Option<Severity>)> {
    reftrim_settings::PROFILES
        .iter()
        .map(|&profile| {
            let severity = if check_id == ids::CHECK_TOOL_RUNTIME {
                // Runtime failures bypass check policy.
                Some(Severity::Warning)
            } else {
                reftrim_settings::preset(profile)
                    .check_policy(check_id)
                    .map(|policy| policy.severity)
            };
            (profile, severity)
        })
        .collect()
}

fn suggest(identifier: &str) -> Vec<&'static str> {
    let needle = identifier.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    explain::all_check_ids()
        .iter()
        .chain(explain::all_codes())
        .copied()
        .filter(|known| known.contains(needle.as_str()))
        .collect()
}

fn severity_label(severity: Option<Severity>) -> &'static str {
    match severity {
        Some(Severity::Info) => "info",
        Some(Severity::Warning) => "warning",
        None => "off",
    }
}

/// Format a topic for terminal display.
pub fn format_explanation(topic: &ExplainTopic) -> String {
    let exp = &topic.explanation;
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");

    out.push_str("Reported as\n");
    out.push_str("-----------\n");
    out.push_str(&format!("check_id: {}\n", topic.check_id));
    for (code, outcome) in &topic.codes {
        out.push_str(&format!("code: {code} ({})\n", outcome.describe()));
    }
    for (profile, severity) in &topic.profiles {
        out.push_str(&format!("{profile} profile: {}\n", severity_label(*severity)));
    }
    let caveated = topic
        .codes
        .iter()
        .any(|(_, v)| *v == CodeOutcome::Reference(Classification::RemovableWithCaveat));
    if caveated {
        out.push_str(&format!("Message suffix:{TRANSITIVE_CAVEAT}\n"));
    }
    out.push('\n');

    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    out.push_str("Before:\n```xml\n");
    out.push_str(exp.examples.before);
    out.push_str("\n```\n\nAfter:\n```xml\n");
    out.push_str(exp.examples.after);
    out.push_str("\n```\n");

    out
}

/// Format the unknown-identifier message for terminal display.
pub fn format_not_found(identifier: &str, suggestions: &[&'static str]) -> String {
    let mut out = format!("Unknown check_id or code: {identifier}\n\n");

    if !suggestions.is_empty() {
        out.push_str("Did you mean:\n");
        for s in suggestions {
            out.push_str(&format!("  - {s}\n"));
        }
        out.push('\n');
    }

    out.push_str("Available check_ids:\n");
    for id in explain::all_check_ids() {
        out.push_str(&format!("  - {id}\n"));
    }
    out.push_str("\nAvailable codes:\n");
    for code in explain::all_codes() {
        out.push_str(&format!("  - {code}\n"));
    }

    out
}
