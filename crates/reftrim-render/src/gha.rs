use crate::{RenderableReport, RenderableSeverity};

/// Render findings as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = match f.severity {
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Info => "notice",
        };

        let check_id = f.check_id.as_deref().unwrap_or("reftrim");
        let message = escape_data(&format!("[{}:{}] {}", check_id, f.code, f.message));

        match &f.location {
            Some(loc) => out.push(format!("::{} file={}::{}", level, escape_property(&loc.path), message)),
            None => out.push(format!("::{}::{}", level, message)),
        }
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
