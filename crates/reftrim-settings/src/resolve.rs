use crate::{model::ReftrimConfigV1, presets};
use anyhow::Context;
use reftrim_domain::policy::{CheckPolicy, EffectiveConfig, build_globset};
use reftrim_types::Severity;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_findings: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(cfg: ReftrimConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "default".to_string());

    let mut effective = presets::preset(&profile);

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        effective.max_findings = mf as usize;
    }

    if !cfg.implicit_references.is_empty() {
        validate_globs("implicit_references", &cfg.implicit_references)?;
        effective
            .implicit_references
            .extend(cfg.implicit_references.iter().cloned());
    }

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        let entry = effective
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {check_id}"))?;
        }
        if !cc.allow.is_empty() {
            validate_globs(check_id, &cc.allow)?;
            entry.allow = cc.allow.clone();
        }
    }

    Ok(ResolvedConfig { effective })
}

fn validate_globs(scope: &str, patterns: &[String]) -> anyhow::Result<()> {
    build_globset(scope, patterns)?;
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning)"),
    }
}
