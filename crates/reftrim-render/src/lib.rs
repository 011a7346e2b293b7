//! Rendering utilities for CI surfaces (Markdown, GitHub annotations).

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;

pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn finding(severity: RenderableSeverity, check_id: &str, code: &str, message: &str) -> RenderableFinding {
        RenderableFinding {
            severity,
            check_id: Some(check_id.to_string()),
            code: code.to_string(),
            message: message.to_string(),
            location: Some(RenderableLocation {
                path: "src/App/App.csproj".to_string(),
            }),
            help: None,
            url: None,
        }
    }

    pub fn report(verdict: RenderableVerdictStatus, findings: Vec<RenderableFinding>) -> RenderableReport {
        let n = findings.len() as u32;
        RenderableReport {
            verdict,
            reasons: Vec::new(),
            findings,
            data: RenderableData {
                project: "src/App/App.csproj".to_string(),
                target: Some("net8.0".to_string()),
                findings_emitted: n,
                findings_total: n,
                truncated_reason: None,
            },
        }
    }
}
