//! Used-module report written by the compiler host.
//!
//! One module per line, `path` or `path<TAB>declared name`. Blank lines are ignored.

use camino::{Utf8Path, Utf8PathBuf};
use reftrim_domain::model::UsedModuleSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsedModulesError {
    #[error("used-module report not found: {path}")]
    Missing { path: Utf8PathBuf },

    #[error("read used-module report {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UsedModulesError {
    pub fn is_input_missing(&self) -> bool {
        matches!(self, UsedModulesError::Missing { .. })
    }
}

pub fn parse_used_modules(text: &str) -> UsedModuleSet {
    let mut paths = Vec::new();
    let mut names = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once('\t') {
            Some((path, name)) => {
                paths.push(path.to_string());
                let name = name.trim();
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
            None => paths.push(line.to_string()),
        }
    }

    UsedModuleSet::from_paths(paths).with_names(names)
}

pub fn load_used_modules(path: &Utf8Path) -> Result<UsedModuleSet, UsedModulesError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            UsedModulesError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            UsedModulesError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(parse_used_modules(&text))
}
