//! Transitive contribution: for every package, the modules that become
//! load-bearing when it is referenced.
//!
//! Each package's own modules are pushed upward along the reverse index, so a
//! package's contribution also contains the modules of every package that
//! (directly or indirectly) depends on it.

use crate::graph::{DependencyGraph, GraphError};
use crate::model::ContributedModule;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Sparse map `package id -> modules`. Absent means "contributes nothing".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitiveContribution {
    by_package: BTreeMap<String, BTreeSet<ContributedModule>>,
}

impl TransitiveContribution {
    /// Breadth-first propagation from every package with modules.
    ///
    /// One visited set per source package: a package reachable through several
    /// paths (diamonds) receives the source's modules once, and the walk
    /// terminates even if the input contains a cycle.
    pub fn resolve(graph: &DependencyGraph) -> Result<Self, GraphError> {
        graph.validate()?;

        let mut by_package: BTreeMap<String, BTreeSet<ContributedModule>> = BTreeMap::new();

        for source in graph.packages().filter(|p| !p.modules.is_empty()) {
            let mut visited: HashSet<&str> = HashSet::new();
            let mut queue: VecDeque<&str> = VecDeque::new();
            queue.push_back(source.id.as_str());

            while let Some(current) = queue.pop_front() {
                if !visited.insert(current) {
                    continue;
                }
                by_package
                    .entry(current.to_string())
                    .or_default()
                    .extend(source.modules.iter().cloned());

                for dependent in graph.dependents_of(current) {
                    if !visited.contains(dependent) {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        Ok(Self { by_package })
    }

    pub fn get(&self, id: &str) -> Option<&BTreeSet<ContributedModule>> {
        self.by_package.get(id)
    }

    /// Modules reachable from `id`; empty when the package contributes nothing.
    pub fn modules_of(&self, id: &str) -> impl Iterator<Item = &ContributedModule> {
        self.by_package.get(id).into_iter().flatten()
    }

    pub fn contains_package(&self, id: &str) -> bool {
        self.by_package.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_package.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_package.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<ContributedModule>)> {
        self.by_package.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A dependency graph together with its resolved transitive contributions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageIndex {
    pub graph: DependencyGraph,
    pub transitive: TransitiveContribution,
}

impl PackageIndex {
    pub fn build(graph: DependencyGraph) -> Result<Self, GraphError> {
        let transitive = TransitiveContribution::resolve(&graph)?;
        Ok(Self { graph, transitive })
    }

    /// Index for projects without package references.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::package;

    fn paths(set: Option<&BTreeSet<ContributedModule>>) -> Vec<&str> {
        set.map(|s| s.iter().map(|m| m.path.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn dependency_receives_modules_of_its_dependents() {
        // A depends on B.
        let graph = DependencyGraph::new([
            package("A", &["B"], &["a.dll"]),
            package("B", &[], &["b.dll"]),
        ]);
        let t = TransitiveContribution::resolve(&graph).expect("resolve");

        assert_eq!(paths(t.get("A")), vec!["a.dll"]);
        assert_eq!(paths(t.get("B")), vec!["a.dll", "b.dll"]);
    }

    #[test]
    fn diamond_counts_each_module_once() {
        // Top -> Left -> Bottom, Top -> Right -> Bottom
        let graph = DependencyGraph::new([
            package("Top", &["Left", "Right"], &["top.dll"]),
            package("Left", &["Bottom"], &["left.dll"]),
            package("Right", &["Bottom"], &["right.dll"]),
            package("Bottom", &[], &["bottom.dll"]),
        ]);
        let t = TransitiveContribution::resolve(&graph).expect("resolve");

        assert_eq!(
            paths(t.get("Bottom")),
            vec!["bottom.dll", "left.dll", "right.dll", "top.dll"]
        );
        assert_eq!(paths(t.get("Left")), vec!["left.dll", "top.dll"]);
        assert_eq!(paths(t.get("Top")), vec!["top.dll"]);
    }

    #[test]
    fn packages_without_modules_or_contributing_dependents_are_absent() {
        let graph = DependencyGraph::new([
            package("Analyzers", &[], &[]),
            package("Lib", &[], &["lib.dll"]),
        ]);
        let t = TransitiveContribution::resolve(&graph).expect("resolve");

        assert!(!t.contains_package("Analyzers"));
        assert_eq!(t.modules_of("Analyzers").count(), 0);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn package_without_own_modules_inherits_from_dependents() {
        let graph = DependencyGraph::new([
            package("Facade", &["Abstractions"], &["facade.dll"]),
            package("Abstractions", &[], &[]),
        ]);
        let t = TransitiveContribution::resolve(&graph).expect("resolve");

        assert_eq!(paths(t.get("Abstractions")), vec!["facade.dll"]);
    }

    #[test]
    fn cycles_terminate() {
        let graph = DependencyGraph::new([
            package("A", &["B"], &["a.dll"]),
            package("B", &["A"], &["b.dll"]),
        ]);
        let t = TransitiveContribution::resolve(&graph).expect("resolve");

        assert_eq!(paths(t.get("A")), vec!["a.dll", "b.dll"]);
        assert_eq!(paths(t.get("B")), vec!["a.dll", "b.dll"]);
    }

    #[test]
    fn inconsistent_graph_is_rejected() {
        let mut dependents = BTreeMap::new();
        dependents.insert("A".to_string(), BTreeSet::from(["Ghost".to_string()]));
        let graph = DependencyGraph::from_parts(BTreeMap::new(), dependents);

        assert!(matches!(
            TransitiveContribution::resolve(&graph),
            Err(GraphError::UnknownDependent { .. })
        ));
        assert!(PackageIndex::build(graph).is_err());
    }
}
