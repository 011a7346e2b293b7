//! Diagnostic emission: assessments in, ordered findings out.

use crate::classify::{Assessment, Classification};
use crate::fingerprint::fingerprint_for_reference;
use crate::model::{DeclaredReference, ReferenceKind};
use crate::policy::{CheckPolicy, EffectiveConfig, PolicyError, build_globset, is_match};
use globset::GlobSet;
use reftrim_types::category::TRANSITIVE_CAVEAT;
use reftrim_types::{DiagnosticCategory, Finding, Location, ids};
use serde_json::json;

/// Caller-supplied suppression, evaluated before a finding is built.
pub trait IgnorePredicate {
    fn ignore(&self, reference: &DeclaredReference) -> bool;
}

impl<F> IgnorePredicate for F
where
    F: Fn(&DeclaredReference) -> bool,
{
    fn ignore(&self, reference: &DeclaredReference) -> bool {
        self(reference)
    }
}

/// Suppresses nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIgnore;

impl IgnorePredicate for NoIgnore {
    fn ignore(&self, _reference: &DeclaredReference) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EmitContext<'a> {
    /// Project descriptor the findings are attached to.
    pub project: &'a str,
    pub doc_generation_enabled: bool,
}

struct ActiveCheck<'a> {
    category: DiagnosticCategory,
    policy: &'a CheckPolicy,
    allow: Option<GlobSet>,
}

impl<'a> ActiveCheck<'a> {
    fn new(cfg: &'a EffectiveConfig, category: DiagnosticCategory) -> Result<Option<Self>, PolicyError> {
        let Some(policy) = cfg.check_policy(category.check_id()) else {
            return Ok(None);
        };
        let allow = build_globset(category.check_id(), &policy.allow)?;
        Ok(Some(Self {
            category,
            policy,
            allow,
        }))
    }
}

/// Build findings in declaration order.
///
/// Assessments must be in declaration order (as produced by
/// [`crate::classify::classify`]). Excluded and used references produce nothing;
/// allowlisted or caller-ignored references are dropped without being counted.
pub fn emit(
    assessments: &[Assessment<'_>],
    ctx: EmitContext<'_>,
    cfg: &EffectiveConfig,
    ignore: &dyn IgnorePredicate,
) -> Result<Vec<Finding>, PolicyError> {
    let mut out = Vec::new();

    if !ctx.doc_generation_enabled
        && let Some(policy) = cfg.check_policy(ids::CHECK_REFS_DOC_GENERATION)
    {
        out.push(doc_generation_finding(ctx.project, policy));
    }

    let direct = ActiveCheck::new(cfg, DiagnosticCategory::DirectReference)?;
    let module = ActiveCheck::new(cfg, DiagnosticCategory::ModuleReference)?;
    let package = ActiveCheck::new(cfg, DiagnosticCategory::PackageReference)?;

    for assessment in assessments {
        let Some(classification) = assessment.status.classification() else {
            continue;
        };
        if !classification.is_removable() {
            continue;
        }

        let reference = assessment.reference;
        let check = match reference.kind {
            ReferenceKind::Direct => direct.as_ref(),
            ReferenceKind::Module => module.as_ref(),
            ReferenceKind::Package => package.as_ref(),
        };
        let Some(check) = check else { continue };

        if is_match(check.allow.as_ref(), &reference.label) || ignore.ignore(reference) {
            continue;
        }

        out.push(reference_finding(ctx.project, check, reference, classification));
    }

    Ok(out)
}

fn doc_generation_finding(project: &str, policy: &CheckPolicy) -> Finding {
    let category = DiagnosticCategory::DocGeneration;
    Finding {
        severity: policy.severity,
        check_id: ids::CHECK_REFS_DOC_GENERATION.to_string(),
        code: ids::CODE_DOC_GENERATION_DISABLED.to_string(),
        message: category.format(&[]),
        location: Some(Location {
            path: project.to_string(),
        }),
        help: Some(
            "Set GenerateDocumentationFile to true so references used only from doc comments are seen."
                .to_string(),
        ),
        url: None,
        fingerprint: Some(fingerprint_for_reference(
            ids::CHECK_REFS_DOC_GENERATION,
            ids::CODE_DOC_GENERATION_DISABLED,
            project,
            "",
        )),
        data: json!({ "project": project }),
    }
}

fn reference_finding(
    project: &str,
    check: &ActiveCheck<'_>,
    reference: &DeclaredReference,
    classification: Classification,
) -> Finding {
    let label = reference.label.as_str();
    let (code, message, help) = match check.category {
        DiagnosticCategory::PackageReference => {
            let caveat = match classification {
                Classification::RemovableWithCaveat => TRANSITIVE_CAVEAT,
                _ => "",
            };
            let code = match classification {
                Classification::RemovableWithCaveat => ids::CODE_PACKAGE_REFERENCE_USED_TRANSITIVELY,
                _ => ids::CODE_PACKAGE_REFERENCE_REMOVABLE,
            };
            (
                code,
                check.category.format(&[label, caveat]),
                "Remove the PackageReference item from the project file.",
            )
        }
        DiagnosticCategory::ModuleReference => (
            ids::CODE_MODULE_REFERENCE_REMOVABLE,
            check.category.format(&[label]),
            "Remove the ProjectReference item from the project file.",
        ),
        DiagnosticCategory::DirectReference | DiagnosticCategory::DocGeneration => (
            ids::CODE_REFERENCE_REMOVABLE,
            check.category.format(&[label]),
            "Remove the Reference item from the project file.",
        ),
    };

    let check_id = check.category.check_id();
    Finding {
        severity: check.policy.severity,
        check_id: check_id.to_string(),
        code: code.to_string(),
        message,
        location: Some(Location {
            path: project.to_string(),
        }),
        help: Some(help.to_string()),
        url: None,
        fingerprint: Some(fingerprint_for_reference(check_id, code, project, label)),
        data: json!({
            "label": label,
            "kind": reference.kind.as_str(),
            "classification": classification.as_str(),
            "identity": reference.identity,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Exclusion, Status};
    use crate::test_support::{all_checks_config, direct, module_ref};
    use reftrim_types::Severity;

    const PROJECT: &str = "src/App/App.csproj";

    fn ctx(doc_generation_enabled: bool) -> EmitContext<'static> {
        EmitContext {
            project: PROJECT,
            doc_generation_enabled,
        }
    }

    fn assess(reference: &DeclaredReference, index: usize, status: Status) -> Assessment<'_> {
        Assessment {
            index,
            reference,
            status,
        }
    }

    #[test]
    fn findings_follow_declaration_order_and_skip_used_and_excluded() {
        let refs = [
            direct("/lib/b.dll", "b"),
            module_ref("/out/Core.dll", "../Core/Core.csproj"),
            direct("/lib/mscorlib.dll", "mscorlib"),
            direct("/lib/a.dll", "a"),
        ];
        let assessments = vec![
            assess(&refs[0], 0, Status::Classified(Classification::Removable)),
            assess(&refs[1], 1, Status::Classified(Classification::Removable)),
            assess(&refs[2], 2, Status::Excluded(Exclusion::PlatformImplicit)),
            assess(&refs[3], 3, Status::Classified(Classification::Used)),
        ];

        let findings = emit(&assessments, ctx(true), &all_checks_config(), &NoIgnore).expect("emit");
        let messages: Vec<_> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Reference b can be removed",
                "Module reference ../Core/Core.csproj can be removed",
            ]
        );
        assert_eq!(findings[1].code, ids::CODE_MODULE_REFERENCE_REMOVABLE);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn caveat_qualifies_package_message() {
        let reference = DeclaredReference::new("/nuget/b.dll", ReferenceKind::Package, "B");
        let assessments = vec![assess(
            &reference,
            0,
            Status::Classified(Classification::RemovableWithCaveat),
        )];
        let findings = emit(&assessments, ctx(true), &all_checks_config(), &NoIgnore).expect("emit");

        assert_eq!(
            findings[0].message,
            "Package reference B can be removed (though a dependent package may still use it transitively)"
        );
        assert_eq!(findings[0].code, ids::CODE_PACKAGE_REFERENCE_USED_TRANSITIVELY);
        assert_eq!(findings[0].data["classification"], "removable_with_caveat");
    }

    #[test]
    fn doc_generation_warning_comes_first() {
        let reference = direct("/lib/x.dll", "x");
        let assessments = vec![assess(&reference, 0, Status::Classified(Classification::Removable))];
        let findings = emit(&assessments, ctx(false), &all_checks_config(), &NoIgnore).expect("emit");

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].check_id, ids::CHECK_REFS_DOC_GENERATION);
        assert_eq!(
            findings[0].message,
            "Enable documentation generation for accurate detection of used references"
        );
    }

    #[test]
    fn predicate_and_allowlist_suppress() {
        let refs = [direct("/lib/x.dll", "x"), direct("/lib/Legacy.Interop.dll", "Legacy.Interop")];
        let assessments: Vec<_> = refs
            .iter()
            .enumerate()
            .map(|(i, r)| assess(r, i, Status::Classified(Classification::Removable)))
            .collect();

        let ignore_x = |r: &DeclaredReference| r.label == "x";
        let findings = emit(&assessments, ctx(true), &all_checks_config(), &ignore_x).expect("emit");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].data["label"], "Legacy.Interop");

        let mut cfg = all_checks_config();
        if let Some(policy) = cfg.checks.get_mut(ids::CHECK_REFS_DIRECT_REFERENCE) {
            policy.allow = vec!["Legacy.*".to_string()];
        }
        let findings = emit(&assessments, ctx(true), &cfg, &ignore_x).expect("emit");
        assert!(findings.is_empty());
    }

    #[test]
    fn disabled_check_emits_nothing() {
        let reference = direct("/lib/x.dll", "x");
        let assessments = vec![assess(&reference, 0, Status::Classified(Classification::Removable))];
        let mut cfg = all_checks_config();
        cfg.checks
            .insert(ids::CHECK_REFS_DIRECT_REFERENCE.to_string(), CheckPolicy::disabled());
        cfg.checks
            .insert(ids::CHECK_REFS_DOC_GENERATION.to_string(), CheckPolicy::disabled());

        let findings = emit(&assessments, ctx(false), &cfg, &NoIgnore).expect("emit");
        assert!(findings.is_empty());
    }

    #[test]
    fn findings_carry_fingerprint_and_location() {
        let reference = direct("/lib/x.dll", "x");
        let assessments = vec![assess(&reference, 0, Status::Classified(Classification::Removable))];
        let findings = emit(&assessments, ctx(true), &all_checks_config(), &NoIgnore).expect("emit");

        let f = &findings[0];
        assert_eq!(f.location.as_ref().map(|l| l.path.as_str()), Some(PROJECT));
        assert_eq!(
            f.fingerprint.as_deref(),
            Some(
                fingerprint_for_reference(
                    ids::CHECK_REFS_DIRECT_REFERENCE,
                    ids::CODE_REFERENCE_REMOVABLE,
                    PROJECT,
                    "x"
                )
                .as_str()
            )
        );
        assert_eq!(f.data["identity"], "/lib/x.dll");
    }
}
