use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Reftrim report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Skip => "SKIP",
    };
    match &report.data.target {
        Some(target) => out.push_str(&format!("- Project: `{}` ({})\n", report.data.project, target)),
        None => out.push_str(&format!("- Project: `{}`\n", report.data.project)),
    }
    out.push_str(&format!(
        "- Verdict: **{}**\n- Findings: {} (emitted) / {} (total)\n",
        verdict, report.data.findings_emitted, report.data.findings_total
    ));
    if !report.reasons.is_empty() {
        out.push_str(&format!("- Reasons: {}\n", report.reasons.join(", ")));
    }
    out.push('\n');

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
        };

        out.push_str(&format!(
            "- [{}] `{}` / `{}`: {}\n",
            sev,
            f.check_id.as_deref().unwrap_or(""),
            f.code,
            f.message
        ));

        if let Some(help) = &f.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
        if let Some(url) = &f.url {
            out.push_str(&format!("  - url: {}\n", url));
        }
    }

    out
}
