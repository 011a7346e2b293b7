use globset::GlobSet;
use reftrim_domain::emit::IgnorePredicate;
use reftrim_domain::model::DeclaredReference;
use reftrim_domain::policy::{PolicyError, build_globset, is_match};

/// Scope reported when an `--ignore` pattern does not compile.
pub const IGNORE_SCOPE: &str = "ignore";

/// Host-side suppression by reference label, on top of the per-check allowlists.
#[derive(Clone, Debug, Default)]
pub struct LabelIgnore {
    set: Option<GlobSet>,
}

impl LabelIgnore {
    pub fn new(patterns: &[String]) -> Result<Self, PolicyError> {
        Ok(Self {
            set: build_globset(IGNORE_SCOPE, patterns)?,
        })
    }
}

impl IgnorePredicate for LabelIgnore {
    fn ignore(&self, reference: &DeclaredReference) -> bool {
        is_match(self.set.as_ref(), &reference.label)
    }
}
