//! Filesystem adapters: the declared reference store, the lock manifest graph
//! builder, module metadata and the used-module report.
//!
//! This crate is allowed to do filesystem IO. It should not spawn external processes;
//! the compiler's usage report is produced elsewhere and handed over as a file.

#![forbid(unsafe_code)]

pub mod cache;
pub mod declared;
pub mod lock_manifest;
pub mod module_name;
pub mod used;
pub mod write;

pub use cache::AnalysisCache;
pub use declared::{StoreError, load_declared_references, save_declared_references};
pub use lock_manifest::{LockManifestError, TargetSelector, load_package_index};
pub use module_name::{MetadataNameResolver, ModuleNameError, ModuleNameResolver};
pub use used::{UsedModulesError, load_used_modules};
pub use write::{WriteOutcome, write_if_changed};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;
    use camino::{Utf8Path, Utf8PathBuf};

    struct NoMetadata;

    impl ModuleNameResolver for NoMetadata {
        fn module_name(&self, path: &Utf8Path) -> Result<String, ModuleNameError> {
            Err(ModuleNameError::NoManifest {
                path: path.to_path_buf(),
            })
        }
    }

    /// Parse arbitrary text as a declared reference store.
    ///
    /// Returns the number of records on success. **Never panics** on any input.
    pub fn parse_declared_store(text: &str) -> Result<usize, StoreError> {
        let records = declared::parse_declared_references(Utf8Path::new("<fuzz>"), text)?;
        Ok(records.len())
    }

    /// Parse arbitrary text as a lock manifest and build the graph of every target
    /// it declares, without probing any package folder.
    ///
    /// **Never panics** on any input.
    pub fn parse_lock_manifest(text: &str) -> Result<usize, LockManifestError> {
        let manifest = lock_manifest::parse_lock_manifest(text)?;
        let folders: Vec<Utf8PathBuf> = Vec::new();
        let mut packages = 0;
        let targets: Vec<String> = manifest.targets().map(str::to_string).collect();
        for target in targets {
            let selector = TargetSelector::new(target, None);
            let graph = manifest.build_graph_in(&selector, &folders, &NoMetadata)?;
            packages += graph.len();
        }
        Ok(packages)
    }
}
