use crate::classify::{ImplicitReferences, classify};
use crate::emit::{EmitContext, IgnorePredicate, emit};
use crate::model::{DeclaredReference, UsedModuleSet};
use crate::policy::{EffectiveConfig, PolicyError};
use crate::report::{DomainReport, ReferenceOutcome, SeverityCounts};
use crate::transitive::PackageIndex;
use reftrim_types::{Finding, ReftrimData, Severity, VerdictStatus};

/// Everything the engine needs about one project.
#[derive(Clone, Copy, Debug)]
pub struct AnalysisInput<'a> {
    pub project: &'a str,
    /// Lock manifest target the packages were resolved for, if any.
    pub target: Option<&'a str>,
    pub references: &'a [DeclaredReference],
    pub used: &'a UsedModuleSet,
    pub packages: &'a PackageIndex,
    pub doc_generation_enabled: bool,
}

pub fn evaluate(
    input: &AnalysisInput<'_>,
    cfg: &EffectiveConfig,
    ignore: &dyn IgnorePredicate,
) -> Result<DomainReport, PolicyError> {
    let implicit = ImplicitReferences::new(&cfg.implicit_references)?;
    let assessments = classify(input.references, input.used, input.packages, &implicit);

    let findings = emit(
        &assessments,
        EmitContext {
            project: input.project,
            doc_generation_enabled: input.doc_generation_enabled,
        },
        cfg,
        ignore,
    )?;

    let total = findings.len() as u32;

    // Emission order is declaration order; truncation keeps the earliest.
    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let verdict = compute_verdict(&emitted);
    let counts = SeverityCounts::from_findings(&emitted);

    let outcomes = assessments
        .iter()
        .map(|a| ReferenceOutcome {
            label: a.reference.label.clone(),
            kind: a.reference.kind,
            status: a.status,
        })
        .collect();

    let data = ReftrimData {
        project: input.project.to_string(),
        target: input.target.map(str::to_string),
        profile: cfg.profile.clone(),
        references_declared: input.references.len() as u32,
        packages_resolved: input.packages.graph.len() as u32,
        modules_used: input.used.len() as u32,
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    Ok(DomainReport {
        verdict,
        findings: emitted,
        data,
        counts,
        outcomes,
    })
}

fn compute_verdict(findings: &[Finding]) -> VerdictStatus {
    if findings.iter().any(|f| f.severity == Severity::Warning) {
        VerdictStatus::Warn
    } else {
        VerdictStatus::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classification, Exclusion, Status};
    use crate::emit::NoIgnore;
    use crate::graph::DependencyGraph;
    use crate::policy::CheckPolicy;
    use crate::test_support::{all_checks_config, direct, module_ref, package, package_refs};
    use reftrim_types::ids;

    fn input<'a>(
        references: &'a [DeclaredReference],
        used: &'a UsedModuleSet,
        packages: &'a PackageIndex,
    ) -> AnalysisInput<'a> {
        AnalysisInput {
            project: "App.csproj",
            target: Some("net8.0"),
            references,
            used,
            packages,
            doc_generation_enabled: true,
        }
    }

    #[test]
    fn mixed_project_end_to_end() {
        let packages = PackageIndex::build(DependencyGraph::new([
            package("A", &["B"], &["/nuget/a/lib/a.dll"]),
            package("B", &[], &["/nuget/b/lib/b.dll"]),
            package("C", &[], &["/nuget/c/lib/c.dll"]),
        ]))
        .expect("index");

        let mut refs = vec![direct("/lib/x.dll", "x")];
        refs.extend(package_refs("A", &["/nuget/a/lib/a.dll"]));
        refs.extend(package_refs("B", &["/nuget/b/lib/b.dll"]));
        refs.push(module_ref("", "../Gone/Gone.csproj"));
        refs.extend(package_refs("C", &["/nuget/c/lib/c.dll"]));
        let used = UsedModuleSet::from_paths(["/nuget/a/lib/a.dll"]);

        let report = evaluate(&input(&refs, &used, &packages), &all_checks_config(), &NoIgnore)
            .expect("evaluate");

        let messages: Vec<_> = report.findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Reference x can be removed",
                "Package reference B can be removed (though a dependent package may still use it transitively)",
                "Package reference C can be removed",
            ]
        );
        assert_eq!(report.verdict, VerdictStatus::Warn);
        assert_eq!(report.counts.warning, 3);
        assert_eq!(report.data.references_declared, 5);
        assert_eq!(report.data.packages_resolved, 3);
        assert_eq!(report.data.modules_used, 1);
        assert_eq!(report.data.target.as_deref(), Some("net8.0"));

        let statuses: Vec<_> = report.outcomes.iter().map(|o| (o.label.as_str(), o.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("x", Status::Classified(Classification::Removable)),
                ("A", Status::Classified(Classification::Used)),
                ("B", Status::Classified(Classification::RemovableWithCaveat)),
                ("../Gone/Gone.csproj", Status::Classified(Classification::Used)),
                ("C", Status::Classified(Classification::Removable)),
            ]
        );
    }

    #[test]
    fn truncation_keeps_earliest_and_records_reason() {
        let refs: Vec<_> = (0..5)
            .map(|i| direct(&format!("/lib/r{i}.dll"), &format!("r{i}")))
            .collect();
        let used = UsedModuleSet::default();
        let packages = PackageIndex::empty();
        let mut cfg = all_checks_config();
        cfg.max_findings = 2;

        let report = evaluate(&input(&refs, &used, &packages), &cfg, &NoIgnore).expect("evaluate");
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0].data["label"], "r0");
        assert_eq!(report.data.findings_total, 5);
        assert_eq!(report.data.findings_emitted, 2);
        assert_eq!(
            report.data.truncated_reason.as_deref(),
            Some("findings truncated to max_findings=2")
        );
    }

    #[test]
    fn info_only_findings_pass() {
        let refs = vec![direct("/lib/x.dll", "x")];
        let used = UsedModuleSet::default();
        let packages = PackageIndex::empty();
        let mut cfg = all_checks_config();
        cfg.checks.insert(
            ids::CHECK_REFS_DIRECT_REFERENCE.to_string(),
            CheckPolicy::enabled(Severity::Info),
        );

        let report = evaluate(&input(&refs, &used, &packages), &cfg, &NoIgnore).expect("evaluate");
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.verdict, VerdictStatus::Pass);
        assert_eq!(report.counts.info, 1);
    }

    #[test]
    fn implicit_patterns_come_from_config() {
        let refs = vec![direct("/ref/netstandard.dll", "netstandard")];
        let used = UsedModuleSet::default();
        let packages = PackageIndex::empty();
        let mut cfg = all_checks_config();
        cfg.implicit_references = vec!["netstandard".to_string()];

        let report = evaluate(&input(&refs, &used, &packages), &cfg, &NoIgnore).expect("evaluate");
        assert!(report.findings.is_empty());
        assert_eq!(
            report.outcomes[0].status,
            Status::Excluded(Exclusion::PlatformImplicit)
        );
    }

    #[test]
    fn invalid_implicit_pattern_is_an_error() {
        let refs = vec![direct("/lib/x.dll", "x")];
        let used = UsedModuleSet::default();
        let packages = PackageIndex::empty();
        let mut cfg = all_checks_config();
        cfg.implicit_references = vec!["[".to_string()];

        let err = evaluate(&input(&refs, &used, &packages), &cfg, &NoIgnore).expect_err("bad glob");
        assert_eq!(err.scope, "implicit_references");
    }
}
