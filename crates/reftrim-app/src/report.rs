use anyhow::Context;
use reftrim_domain::report::DomainReport;
use reftrim_render::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use reftrim_types::{
    Finding, Location, ReftrimData, ReftrimReport, RunMeta, SCHEMA_REPORT_V1, Severity, ToolMeta,
    Verdict, VerdictCounts, VerdictStatus, ids,
};
use time::OffsetDateTime;

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "reftrim".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn run_meta(started_at: OffsetDateTime) -> RunMeta {
    let ended_at = OffsetDateTime::now_utc();
    let duration_ms = (ended_at - started_at).whole_milliseconds().max(0) as u64;
    RunMeta {
        started_at: Some(started_at),
        ended_at: Some(ended_at),
        duration_ms: Some(duration_ms),
    }
}

fn base_data(project: &str, target: Option<&str>, profile: &str) -> ReftrimData {
    ReftrimData {
        project: project.to_string(),
        target: target.map(str::to_string),
        profile: profile.to_string(),
        ..ReftrimData::default()
    }
}

pub(crate) fn analysis_report(domain: DomainReport, started_at: OffsetDateTime) -> ReftrimReport {
    let DomainReport {
        verdict,
        findings,
        data,
        counts,
        outcomes: _,
    } = domain;

    let mut reasons = Vec::new();
    if data.truncated_reason.is_some() {
        reasons.push(ids::REASON_TRUNCATED.to_string());
    }

    ReftrimReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: run_meta(started_at),
        verdict: Verdict {
            status: verdict,
            counts: VerdictCounts {
                info: counts.info,
                warn: counts.warning,
            },
            reasons,
        },
        findings,
        data,
    }
}

/// Report for a run that could not classify because an input is missing.
pub fn skip_report(project: &str, target: Option<&str>, profile: &str, reason: &str) -> ReftrimReport {
    let now = OffsetDateTime::now_utc();
    ReftrimReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: run_meta(now),
        verdict: Verdict {
            status: VerdictStatus::Skip,
            counts: VerdictCounts::default(),
            reasons: vec![reason.to_string()],
        },
        findings: Vec::new(),
        data: base_data(project, target, profile),
    }
}

/// Report carrying a single `tool.runtime` finding. Never an error verdict: removable
/// references must not break the build, and neither may the tool that finds them.
pub fn runtime_error_report(
    project: &str,
    target: Option<&str>,
    profile: &str,
    message: &str,
) -> ReftrimReport {
    let now = OffsetDateTime::now_utc();
    let mut data = base_data(project, target, profile);
    data.findings_total = 1;
    data.findings_emitted = 1;

    ReftrimReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: run_meta(now),
        verdict: Verdict {
            status: VerdictStatus::Warn,
            counts: VerdictCounts { info: 0, warn: 1 },
            reasons: vec![ids::REASON_TOOL_ERROR.to_string()],
        },
        findings: vec![Finding {
            severity: Severity::Warning,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            location: Some(Location {
                path: project.to_string(),
            }),
            help: Some("Fix the tool error and re-run reftrim.".to_string()),
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data,
    }
}

/// Copy of `report` with the run timing removed, for files that are only
/// rewritten when their content changes.
pub fn without_timing(report: &ReftrimReport) -> ReftrimReport {
    ReftrimReport {
        run: RunMeta::default(),
        ..report.clone()
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<ReftrimReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse reftrim report")
}

pub fn serialize_report(report: &ReftrimReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &ReftrimReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict.status {
            VerdictStatus::Pass => RenderableVerdictStatus::Pass,
            VerdictStatus::Warn => RenderableVerdictStatus::Warn,
            VerdictStatus::Skip => RenderableVerdictStatus::Skip,
        },
        reasons: report.verdict.reasons.clone(),
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            project: report.data.project.clone(),
            target: report.data.target.clone(),
            findings_emitted: report.data.findings_emitted,
            findings_total: report.data.findings_total,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
        },
        check_id: Some(f.check_id.clone()),
        code: f.code.clone(),
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.clone(),
        }),
        help: f.help.clone(),
        url: f.url.clone(),
    }
}
