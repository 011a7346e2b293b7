use crate::model::{ContributedModule, DeclaredReference, ReferenceKind, ResolvedPackage};
use crate::policy::{CheckPolicy, EffectiveConfig};
use reftrim_types::{DiagnosticCategory, Severity};
use std::collections::BTreeMap;

/// A package whose modules are named after their file stems.
pub fn package(id: &str, deps: &[&str], modules: &[&str]) -> ResolvedPackage {
    ResolvedPackage {
        id: id.to_string(),
        version: "1.0.0".to_string(),
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        modules: modules
            .iter()
            .map(|path| ContributedModule::new(*path, stem(path)))
            .collect(),
        build_files: Default::default(),
    }
}

fn stem(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.').map(|(s, _)| s).unwrap_or(file)
}

pub fn direct(identity: &str, label: &str) -> DeclaredReference {
    DeclaredReference::new(identity, ReferenceKind::Direct, label)
}

pub fn module_ref(identity: &str, label: &str) -> DeclaredReference {
    DeclaredReference::new(identity, ReferenceKind::Module, label)
}

/// One package record per contributed module, all labelled with the package name.
pub fn package_refs(label: &str, modules: &[&str]) -> Vec<DeclaredReference> {
    modules
        .iter()
        .map(|m| DeclaredReference::new(*m, ReferenceKind::Package, label))
        .collect()
}

pub fn all_checks_config() -> EffectiveConfig {
    let checks: BTreeMap<String, CheckPolicy> = DiagnosticCategory::ALL
        .into_iter()
        .map(|c| (c.check_id().to_string(), CheckPolicy::enabled(Severity::Warning)))
        .collect();
    EffectiveConfig {
        profile: "test".to_string(),
        max_findings: 200,
        checks,
        implicit_references: Vec::new(),
    }
}
