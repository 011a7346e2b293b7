//! Analyze use case: load inputs, classify, and build a report.

use crate::ignore::LabelIgnore;
use crate::report::{analysis_report, runtime_error_report, skip_report};
use anyhow::Context;
use camino::Utf8Path;
use reftrim_domain::emit::IgnorePredicate;
use reftrim_domain::model::ReferenceKind;
use reftrim_domain::policy::EffectiveConfig;
use reftrim_domain::report::{DomainReport, ReferenceOutcome};
use reftrim_domain::transitive::PackageIndex;
use reftrim_domain::{AnalysisInput, evaluate};
use reftrim_repo::{
    AnalysisCache, ModuleNameResolver, TargetSelector, load_declared_references, load_used_modules,
};
use reftrim_settings::{Overrides, ResolvedConfig, parse_config_toml, resolve_config};
use reftrim_types::{ReftrimReport, ids};
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Input for one project analysis.
pub struct AnalyzeInput<'a> {
    /// Project descriptor the findings are attached to.
    pub project: &'a str,
    pub declared: &'a Utf8Path,
    pub used: &'a Utf8Path,
    pub lock_manifest: Option<&'a Utf8Path>,
    pub target: Option<TargetSelector>,
    pub doc_generation_enabled: bool,
    /// Raw `reftrim.toml` text; empty means defaults.
    pub config_text: &'a str,
    pub overrides: Overrides,
    /// Extra label globs suppressed for this run only.
    pub ignore: &'a [String],
    pub cache: &'a AnalysisCache,
    pub resolver: &'a dyn ModuleNameResolver,
}

pub struct AnalyzeOutput {
    pub report: ReftrimReport,
    pub resolved_config: ResolvedConfig,
    /// Per-reference classification, empty unless analysis ran to completion.
    pub outcomes: Vec<ReferenceOutcome>,
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// A required input file does not exist yet. `reason` is a stable report reason id.
    #[error("{detail}")]
    InputMissing { reason: &'static str, detail: String },

    #[error(transparent)]
    Malformed(anyhow::Error),
}

/// Run classification for one project, surfacing every failure as an error.
pub fn try_analyze(
    input: &AnalyzeInput<'_>,
    cfg: &EffectiveConfig,
    ignore: &dyn IgnorePredicate,
) -> Result<DomainReport, AnalyzeError> {
    let references = load_declared_references(input.declared).map_err(|err| {
        if err.is_input_missing() {
            AnalyzeError::InputMissing {
                reason: ids::REASON_DECLARED_REFERENCES_MISSING,
                detail: err.to_string(),
            }
        } else {
            AnalyzeError::Malformed(anyhow::Error::new(err).context("load declared references"))
        }
    })?;

    let used = load_used_modules(input.used).map_err(|err| {
        if err.is_input_missing() {
            AnalyzeError::InputMissing {
                reason: ids::REASON_USED_MODULES_MISSING,
                detail: err.to_string(),
            }
        } else {
            AnalyzeError::Malformed(anyhow::Error::new(err).context("load used modules"))
        }
    })?;

    let has_packages = references.iter().any(|r| r.kind == ReferenceKind::Package);
    let packages = if has_packages {
        let Some(path) = input.lock_manifest else {
            return Err(AnalyzeError::InputMissing {
                reason: ids::REASON_LOCK_MANIFEST_MISSING,
                detail: "package references declared but no lock manifest given".to_string(),
            });
        };
        let Some(selector) = input.target.as_ref() else {
            return Err(AnalyzeError::Malformed(anyhow::anyhow!(
                "package references declared but no target framework given"
            )));
        };
        input
            .cache
            .package_index(path, selector, input.resolver)
            .map_err(|err| {
                if err.is_input_missing() {
                    AnalyzeError::InputMissing {
                        reason: ids::REASON_LOCK_MANIFEST_MISSING,
                        detail: err.to_string(),
                    }
                } else {
                    AnalyzeError::Malformed(
                        anyhow::Error::new(err).context(format!("build package graph from {path}")),
                    )
                }
            })?
    } else {
        Arc::new(PackageIndex::empty())
    };

    debug!(
        references = references.len(),
        used = used.len(),
        packages = packages.graph.len(),
        "inputs loaded"
    );

    let target = input.target.as_ref().map(TargetSelector::key);
    let analysis = AnalysisInput {
        project: input.project,
        target: target.as_deref(),
        references: &references,
        used: &used,
        packages: &packages,
        doc_generation_enabled: input.doc_generation_enabled,
    };

    evaluate(&analysis, cfg, ignore)
        .map_err(|err| AnalyzeError::Malformed(anyhow::Error::new(err)))
}

/// Run the analyze use case.
///
/// Only configuration problems are returned as errors. Missing inputs produce a
/// `skip` report and anything else a report with a `tool.runtime` finding.
pub fn run_analyze(input: AnalyzeInput<'_>) -> anyhow::Result<AnalyzeOutput> {
    let started_at = OffsetDateTime::now_utc();

    let model = parse_config_toml(input.config_text).context("parse reftrim config")?;
    let resolved_config =
        resolve_config(model, input.overrides.clone()).context("resolve reftrim config")?;
    let ignore = LabelIgnore::new(input.ignore).context("compile --ignore patterns")?;

    let cfg = &resolved_config.effective;
    let target = input.target.as_ref().map(TargetSelector::key);

    let (report, outcomes) = match try_analyze(&input, cfg, &ignore) {
        Ok(mut domain) => {
            let outcomes = std::mem::take(&mut domain.outcomes);
            info!(
                project = input.project,
                verdict = ?domain.verdict,
                findings = domain.findings.len(),
                "analysis complete"
            );
            (analysis_report(domain, started_at), outcomes)
        }
        Err(AnalyzeError::InputMissing { reason, detail }) => {
            info!(project = input.project, reason, %detail, "skipping analysis");
            (
                skip_report(input.project, target.as_deref(), &cfg.profile, reason),
                Vec::new(),
            )
        }
        Err(AnalyzeError::Malformed(err)) => {
            warn!(project = input.project, error = %format!("{err:#}"), "analysis failed");
            (
                runtime_error_report(
                    input.project,
                    target.as_deref(),
                    &cfg.profile,
                    &format!("{err:#}"),
                ),
                Vec::new(),
            )
        }
    };

    Ok(AnalyzeOutput {
        report,
        resolved_config,
        outcomes,
    })
}
