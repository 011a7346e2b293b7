//! Declared module names, read from the binary's own metadata.

use camino::{Utf8Path, Utf8PathBuf};
use dotscope::CilObject;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleNameError {
    #[error("cannot read module metadata from {path}")]
    Unreadable {
        path: Utf8PathBuf,
        #[source]
        source: dotscope::Error,
    },

    #[error("module {path} has no assembly manifest")]
    NoManifest { path: Utf8PathBuf },
}

/// Resolves the declared name of a module file.
pub trait ModuleNameResolver {
    fn module_name(&self, path: &Utf8Path) -> Result<String, ModuleNameError>;
}

/// Reads the assembly name from ECMA-335 metadata.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetadataNameResolver;

impl ModuleNameResolver for MetadataNameResolver {
    fn module_name(&self, path: &Utf8Path) -> Result<String, ModuleNameError> {
        let object =
            CilObject::from_file(path.as_std_path()).map_err(|source| ModuleNameError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;
        object
            .assembly()
            .map(|assembly| assembly.name.clone())
            .ok_or_else(|| ModuleNameError::NoManifest {
                path: path.to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn non_pe_file_is_unreadable() {
        let tmp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("fake.dll")).expect("utf8 path");
        std::fs::write(&path, b"not a portable executable").expect("write");

        let err = MetadataNameResolver.module_name(&path).expect_err("not managed");
        assert!(matches!(err, ModuleNameError::Unreadable { .. }));
    }
}
