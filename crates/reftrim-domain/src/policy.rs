use globset::{Glob, GlobSet, GlobSetBuilder};
use reftrim_types::Severity;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid glob pattern for {scope}: {pattern}")]
pub struct PolicyError {
    pub scope: String,
    pub pattern: String,
    #[source]
    pub source: globset::Error,
}

#[derive(Clone, Debug)]
pub struct CheckPolicy {
    pub enabled: bool,
    pub severity: Severity,
    /// Label globs that are never reported by this check.
    pub allow: Vec<String>,
}

impl CheckPolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
            allow: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Info,
            allow: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub max_findings: usize,
    pub checks: BTreeMap<String, CheckPolicy>,
    /// Globs naming references the platform provides implicitly.
    pub implicit_references: Vec<String>,
}

impl EffectiveConfig {
    pub fn check_policy(&self, check_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(check_id).filter(|p| p.enabled)
    }
}

/// Compile glob patterns; `None` when there are none.
pub fn build_globset(scope: &str, patterns: &[String]) -> Result<Option<GlobSet>, PolicyError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| PolicyError {
            scope: scope.to_string(),
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|source| PolicyError {
        scope: scope.to_string(),
        pattern: patterns.join(", "),
        source,
    })?;
    Ok(Some(set))
}

pub fn is_match(set: Option<&GlobSet>, value: &str) -> bool {
    set.map(|s| s.is_match(value)).unwrap_or(false)
}
