//! Package dependency graph with a reverse-edge index.
//!
//! Packages are kept in an adjacency map keyed by id; the reverse index
//! (`id -> ids of packages depending on it`) is computed once at construction and
//! never mutated afterwards.

use crate::model::ResolvedPackage;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;
use tracing::debug;

/// Internal inconsistency between the dependency lists and the reverse index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("reverse index lists unknown package '{dependent}' as a dependent of '{package}'")]
    UnknownDependent { package: String, dependent: String },

    #[error("reverse index is not the transpose of the dependency lists at '{dependent}' -> '{package}'")]
    NotTransposed { package: String, dependent: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    packages: BTreeMap<String, ResolvedPackage>,
    dependents: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Build a graph and its reverse index.
    ///
    /// Dependency ids are matched case-insensitively and rewritten to the canonical
    /// id of the package they name. Dependencies on packages outside the graph
    /// (projects, framework-provided entries) are dropped.
    pub fn new(packages: impl IntoIterator<Item = ResolvedPackage>) -> Self {
        let mut packages: BTreeMap<String, ResolvedPackage> = packages
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let canonical: HashMap<String, String> = packages
            .keys()
            .map(|id| (id.to_ascii_lowercase(), id.clone()))
            .collect();

        for package in packages.values_mut() {
            let declared = std::mem::take(&mut package.dependencies);
            for dep in declared {
                match canonical.get(&dep.to_ascii_lowercase()) {
                    Some(id) => {
                        package.dependencies.insert(id.clone());
                    }
                    None => debug!(
                        package = %package.id,
                        dependency = %dep,
                        "dropping dependency on a package outside the lock manifest target"
                    ),
                }
            }
        }

        let dependents = transpose(&packages);
        Self {
            packages,
            dependents,
        }
    }

    /// Assemble a graph from precomputed parts without recomputing the reverse index.
    ///
    /// Use [`DependencyGraph::validate`] before trusting the result.
    pub fn from_parts(
        packages: BTreeMap<String, ResolvedPackage>,
        dependents: BTreeMap<String, BTreeSet<String>>,
    ) -> Self {
        Self {
            packages,
            dependents,
        }
    }

    /// Check that the reverse index is the exact transpose of the dependency lists.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (package, dependents) in &self.dependents {
            for dependent in dependents {
                let Some(dep_pkg) = self.packages.get(dependent) else {
                    return Err(GraphError::UnknownDependent {
                        package: package.clone(),
                        dependent: dependent.clone(),
                    });
                };
                if !dep_pkg.dependencies.contains(package) {
                    return Err(GraphError::NotTransposed {
                        package: package.clone(),
                        dependent: dependent.clone(),
                    });
                }
            }
        }

        for package in self.packages.values() {
            for dep in &package.dependencies {
                let listed = self
                    .dependents
                    .get(dep)
                    .is_some_and(|set| set.contains(&package.id));
                if !listed {
                    return Err(GraphError::NotTransposed {
                        package: dep.clone(),
                        dependent: package.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn package(&self, id: &str) -> Option<&ResolvedPackage> {
        self.packages.get(id)
    }

    /// Look up a package by label: exact id first, then ASCII case-insensitive.
    pub fn find(&self, label: &str) -> Option<&ResolvedPackage> {
        self.packages.get(label).or_else(|| {
            self.packages
                .values()
                .find(|p| p.id.eq_ignore_ascii_case(label))
        })
    }

    pub fn packages(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.packages.values()
    }

    /// Packages that directly depend on `id`.
    pub fn dependents_of(&self, id: &str) -> impl Iterator<Item = &str> {
        self.dependents
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}

fn transpose(packages: &BTreeMap<String, ResolvedPackage>) -> BTreeMap<String, BTreeSet<String>> {
    let mut dependents: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for package in packages.values() {
        for dep in &package.dependencies {
            dependents
                .entry(dep.clone())
                .or_default()
                .insert(package.id.clone());
        }
    }
    dependents
}
