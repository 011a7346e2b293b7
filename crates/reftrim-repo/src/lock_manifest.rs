//! NuGet lock manifest (`project.assets.json`) adapter.
//!
//! Builds the package dependency graph for one target. Only `package` entries
//! are kept; project-to-project entries are the module references' business.

use crate::module_name::{ModuleNameError, ModuleNameResolver};
use camino::{Utf8Path, Utf8PathBuf};
use reftrim_domain::graph::{DependencyGraph, GraphError};
use reftrim_domain::model::{ContributedModule, ResolvedPackage};
use reftrim_domain::transitive::PackageIndex;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// File name NuGet uses as an empty-folder marker.
const PLACEHOLDER: &str = "_._";

#[derive(Debug, Error)]
pub enum LockManifestError {
    #[error("lock manifest not found: {path}")]
    Missing { path: Utf8PathBuf },

    #[error("read lock manifest {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse lock manifest")]
    Parse(#[from] serde_json::Error),

    #[error("target '{selector}' not found in lock manifest (available: {})", .available.join(", "))]
    TargetNotFound {
        selector: String,
        available: Vec<String>,
    },

    #[error("package '{package}' has no libraries entry")]
    LibraryMissing { package: String },

    #[error("module '{module}' of package '{package}' not found in any package folder")]
    ModuleNotFound {
        package: String,
        module: String,
        searched: Vec<Utf8PathBuf>,
    },

    #[error("read metadata of module {path}")]
    ModuleMetadata {
        path: Utf8PathBuf,
        #[source]
        source: ModuleNameError,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl LockManifestError {
    pub fn is_input_missing(&self) -> bool {
        matches!(self, LockManifestError::Missing { .. })
    }
}

/// Which `targets` section to read.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetSelector {
    pub framework: String,
    pub runtime: Option<String>,
}

impl TargetSelector {
    pub fn new(framework: impl Into<String>, runtime: Option<String>) -> Self {
        Self {
            framework: framework.into(),
            runtime: runtime.filter(|r| !r.trim().is_empty()),
        }
    }

    /// Section key: `framework` or `framework/runtime`.
    pub fn key(&self) -> String {
        match &self.runtime {
            Some(rid) => format!("{}/{}", self.framework, rid),
            None => self.framework.clone(),
        }
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetEntry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, JsonValue>,
    #[serde(default)]
    compile: BTreeMap<String, JsonValue>,
    #[serde(default)]
    build: BTreeMap<String, JsonValue>,
    #[serde(default)]
    build_multi_targeting: BTreeMap<String, JsonValue>,
    #[serde(default)]
    build_transitive: BTreeMap<String, JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
struct LibraryEntry {
    #[serde(default)]
    path: Option<String>,
}

/// Keys of a JSON object in document order.
#[derive(Debug, Default)]
struct OrderedKeys(Vec<String>);

impl<'de> Deserialize<'de> for OrderedKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = OrderedKeys;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut keys = Vec::new();
                while let Some((key, _)) = map.next_entry::<String, serde::de::IgnoredAny>()? {
                    keys.push(key);
                }
                Ok(OrderedKeys(keys))
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

/// Parsed lock manifest. Only the sections the graph needs are kept.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockManifest {
    #[serde(default)]
    targets: BTreeMap<String, BTreeMap<String, TargetEntry>>,
    #[serde(default)]
    libraries: BTreeMap<String, LibraryEntry>,
    #[serde(default)]
    package_folders: OrderedKeys,
}

pub fn parse_lock_manifest(text: &str) -> Result<LockManifest, LockManifestError> {
    Ok(serde_json::from_str(text)?)
}

pub fn read_lock_manifest(path: &Utf8Path) -> Result<String, LockManifestError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LockManifestError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            LockManifestError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

impl LockManifest {
    /// Target section keys, in sorted order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Package folders in the order the manifest lists them.
    pub fn package_folders(&self) -> Vec<Utf8PathBuf> {
        self.package_folders.0.iter().map(Utf8PathBuf::from).collect()
    }

    fn select(&self, selector: &TargetSelector) -> Result<&BTreeMap<String, TargetEntry>, LockManifestError> {
        let key = selector.key();
        self.targets
            .get(&key)
            .or_else(|| {
                self.targets
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(&key))
                    .map(|(_, v)| v)
            })
            .ok_or_else(|| LockManifestError::TargetNotFound {
                selector: key,
                available: self.targets.keys().cloned().collect(),
            })
    }

    /// Build the graph for `selector`, probing the manifest's own package folders.
    pub fn build_graph(
        &self,
        selector: &TargetSelector,
        resolver: &dyn ModuleNameResolver,
    ) -> Result<DependencyGraph, LockManifestError> {
        self.build_graph_in(selector, &self.package_folders(), resolver)
    }

    /// Build the graph for `selector`, probing `folders` in order for module files.
    pub fn build_graph_in(
        &self,
        selector: &TargetSelector,
        folders: &[Utf8PathBuf],
        resolver: &dyn ModuleNameResolver,
    ) -> Result<DependencyGraph, LockManifestError> {
        let entries = self.select(selector)?;
        let mut packages = Vec::new();

        for (key, entry) in entries {
            if entry.kind.as_deref() != Some("package") {
                debug!(entry = %key, kind = ?entry.kind, "skipping non-package target entry");
                continue;
            }
            packages.push(self.resolve_package(key, entry, folders, resolver)?);
        }

        Ok(DependencyGraph::new(packages))
    }

    fn resolve_package(
        &self,
        key: &str,
        entry: &TargetEntry,
        folders: &[Utf8PathBuf],
        resolver: &dyn ModuleNameResolver,
    ) -> Result<ResolvedPackage, LockManifestError> {
        let (id, version) = key.split_once('/').unwrap_or((key, ""));

        let library = self
            .libraries
            .get(key)
            .or_else(|| {
                self.libraries
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .ok_or_else(|| LockManifestError::LibraryMissing {
                package: key.to_string(),
            })?;
        let library_path = library
            .path
            .clone()
            .unwrap_or_else(|| key.to_ascii_lowercase());

        let mut package = ResolvedPackage {
            id: id.to_string(),
            version: version.to_string(),
            dependencies: entry.dependencies.keys().cloned().collect(),
            ..ResolvedPackage::default()
        };

        for relative in entry.compile.keys().filter(|k| !is_placeholder(k)) {
            let searched: Vec<Utf8PathBuf> = folders
                .iter()
                .map(|folder| folder.join(&library_path).join(relative))
                .collect();
            let Some(found) = searched.iter().find(|candidate| candidate.is_file()) else {
                return Err(LockManifestError::ModuleNotFound {
                    package: id.to_string(),
                    module: relative.clone(),
                    searched,
                });
            };
            let name = resolver
                .module_name(found)
                .map_err(|source| LockManifestError::ModuleMetadata {
                    path: found.clone(),
                    source,
                })?;
            package
                .modules
                .insert(ContributedModule::new(found.as_str(), name));
        }

        package.build_files = [&entry.build, &entry.build_multi_targeting, &entry.build_transitive]
            .into_iter()
            .flat_map(|section| section.keys())
            .filter(|k| !is_placeholder(k))
            .cloned()
            .collect();

        Ok(package)
    }
}

fn is_placeholder(relative: &str) -> bool {
    relative.rsplit('/').next() == Some(PLACEHOLDER)
}

/// Read, parse and index the lock manifest at `path`.
pub fn load_package_index(
    path: &Utf8Path,
    selector: &TargetSelector,
    resolver: &dyn ModuleNameResolver,
) -> Result<PackageIndex, LockManifestError> {
    let text = read_lock_manifest(path)?;
    let manifest = parse_lock_manifest(&text)?;
    let graph = manifest.build_graph(selector, resolver)?;
    Ok(PackageIndex::build(graph)?)
}
