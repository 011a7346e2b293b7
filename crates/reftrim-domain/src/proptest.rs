//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Transitive contribution closure over arbitrary (possibly cyclic) graphs
//! - Classification monotonicity as the used-module set grows

use crate::classify::{Classification, ImplicitReferences, Status, classify};
use crate::graph::DependencyGraph;
use crate::model::{DeclaredReference, ReferenceKind, ResolvedPackage, UsedModuleSet};
use crate::test_support::{package, package_refs};
use crate::transitive::{PackageIndex, TransitiveContribution};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

// ============================================================================
// Strategies
// ============================================================================

/// Up to seven packages `P0..Pn` with arbitrary edges (cycles allowed, no
/// self-edges) and zero to two modules each.
fn arb_packages() -> impl Strategy<Value = Vec<ResolvedPackage>> {
    (1usize..8)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec(any::<bool>(), n), n),
                prop::collection::vec(0usize..3, n),
            )
        })
        .prop_map(|(edges, module_counts)| {
            let n = module_counts.len();
            (0..n)
                .map(|i| {
                    let deps: Vec<String> = (0..n)
                        .filter(|&j| j != i && edges[i][j])
                        .map(|j| format!("P{j}"))
                        .collect();
                    let modules: Vec<String> = (0..module_counts[i])
                        .map(|k| format!("/nuget/p{i}/lib/M{i}x{k}.dll"))
                        .collect();
                    let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
                    let modules: Vec<&str> = modules.iter().map(String::as_str).collect();
                    package(&format!("P{i}"), &deps, &modules)
                })
                .collect()
        })
}

fn all_module_paths(packages: &[ResolvedPackage]) -> Vec<String> {
    packages
        .iter()
        .flat_map(|p| p.modules.iter().map(|m| m.path.clone()))
        .collect()
}

fn select(paths: &[String], mask: &[bool]) -> Vec<String> {
    paths
        .iter()
        .zip(mask.iter().cycle())
        .filter(|(_, keep)| **keep)
        .map(|(p, _)| p.clone())
        .collect()
}

/// Packages from which `target` is reachable along dependency edges, including itself.
fn ancestors<'a>(graph: &'a DependencyGraph, target: &str) -> BTreeSet<&'a str> {
    graph
        .packages()
        .filter(|p| reaches(graph, &p.id, target))
        .map(|p| p.id.as_str())
        .collect()
}

fn reaches(graph: &DependencyGraph, from: &str, target: &str) -> bool {
    let mut stack = vec![from.to_string()];
    let mut seen = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == target {
            return true;
        }
        if !seen.insert(current.clone()) {
            continue;
        }
        if let Some(p) = graph.package(&current) {
            stack.extend(p.dependencies.iter().cloned());
        }
    }
    false
}

fn rank(status: Status) -> u8 {
    match status {
        Status::Classified(Classification::Removable) => 0,
        Status::Classified(Classification::RemovableWithCaveat) => 1,
        Status::Classified(Classification::Used) => 2,
        Status::Excluded(_) => 3,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Every package's contribution contains its own modules and is exactly the
    /// union of the modules of the packages that reach it.
    #[test]
    fn contribution_is_ancestor_union(packages in arb_packages()) {
        let graph = DependencyGraph::new(packages);
        let transitive = TransitiveContribution::resolve(&graph).expect("consistent graph");

        for p in graph.packages() {
            let got: BTreeSet<&str> = transitive.modules_of(&p.id).map(|m| m.path.as_str()).collect();
            for own in &p.modules {
                prop_assert!(got.contains(own.path.as_str()), "{} missing own module {}", p.id, own.path);
            }

            let expected: BTreeSet<&str> = ancestors(&graph, &p.id)
                .into_iter()
                .filter_map(|id| graph.package(id))
                .flat_map(|a| a.modules.iter().map(|m| m.path.as_str()))
                .collect();
            prop_assert_eq!(got, expected);
        }
    }

    /// Growing the used-module set never moves a reference towards removal.
    #[test]
    fn classification_is_monotone_in_used_set(
        packages in arb_packages(),
        base in prop::collection::vec(any::<bool>(), 1..16),
        extra in prop::collection::vec(any::<bool>(), 1..16),
    ) {
        let paths = all_module_paths(&packages);
        let small = select(&paths, &base);
        let mut large = small.clone();
        large.extend(select(&paths, &extra));

        let refs: Vec<DeclaredReference> = packages
            .iter()
            .flat_map(|p| {
                let modules: Vec<&str> = p.modules.iter().map(|m| m.path.as_str()).collect();
                if modules.is_empty() {
                    // A package without modules is still declared once.
                    vec![DeclaredReference::new("", ReferenceKind::Package, &p.id)]
                } else {
                    package_refs(&p.id, &modules)
                }
            })
            .collect();
        let index = PackageIndex::build(DependencyGraph::new(packages)).expect("consistent graph");
        let implicit = ImplicitReferences::default();

        let before = classify(&refs, &UsedModuleSet::from_paths(&small), &index, &implicit);
        let after = classify(&refs, &UsedModuleSet::from_paths(&large), &index, &implicit);

        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            prop_assert_eq!(b.index, a.index);
            prop_assert!(
                rank(b.status) <= rank(a.status),
                "{} went from {:?} to {:?}",
                b.reference.label,
                b.status,
                a.status
            );
        }
    }
}
