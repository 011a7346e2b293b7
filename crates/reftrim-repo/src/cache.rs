//! Explicit, host-owned analysis cache.
//!
//! Module names are keyed by file path; package indexes by the lock manifest's
//! content digest plus the target selector, so an edited manifest is never served
//! stale.

use crate::lock_manifest::{LockManifestError, TargetSelector, parse_lock_manifest, read_lock_manifest};
use crate::module_name::{ModuleNameError, ModuleNameResolver};
use camino::{Utf8Path, Utf8PathBuf};
use dashmap::DashMap;
use reftrim_domain::transitive::PackageIndex;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct IndexKey {
    digest: String,
    selector: String,
}

#[derive(Debug, Default)]
pub struct AnalysisCache {
    module_names: DashMap<Utf8PathBuf, String>,
    indexes: DashMap<IndexKey, Arc<PackageIndex>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `inner` so names are read at most once per path.
    pub fn resolver<'a>(&'a self, inner: &'a dyn ModuleNameResolver) -> CachingResolver<'a> {
        CachingResolver { cache: self, inner }
    }

    /// Package index for the manifest at `path`, built on first use.
    pub fn package_index(
        &self,
        path: &Utf8Path,
        selector: &TargetSelector,
        resolver: &dyn ModuleNameResolver,
    ) -> Result<Arc<PackageIndex>, LockManifestError> {
        let text = read_lock_manifest(path)?;
        let key = IndexKey {
            digest: hex::encode(Sha256::digest(text.as_bytes())),
            selector: selector.key(),
        };

        if let Some(hit) = self.indexes.get(&key) {
            debug!(path = %path, target = %selector, "package index cache hit");
            return Ok(Arc::clone(hit.value()));
        }

        let manifest = parse_lock_manifest(&text)?;
        let graph = manifest.build_graph(selector, &self.resolver(resolver))?;
        let index = Arc::new(PackageIndex::build(graph)?);
        self.indexes.insert(key, Arc::clone(&index));
        Ok(index)
    }

    pub fn cached_module_names(&self) -> usize {
        self.module_names.len()
    }

    pub fn cached_indexes(&self) -> usize {
        self.indexes.len()
    }
}

pub struct CachingResolver<'a> {
    cache: &'a AnalysisCache,
    inner: &'a dyn ModuleNameResolver,
}

impl ModuleNameResolver for CachingResolver<'_> {
    fn module_name(&self, path: &Utf8Path) -> Result<String, ModuleNameError> {
        if let Some(name) = self.cache.module_names.get(path) {
            return Ok(name.value().clone());
        }
        let name = self.inner.module_name(path)?;
        self.cache
            .module_names
            .insert(path.to_path_buf(), name.clone());
        Ok(name)
    }
}
