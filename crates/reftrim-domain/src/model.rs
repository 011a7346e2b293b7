use reftrim_types::DiagnosticCategory;
use std::collections::BTreeSet;

/// What kind of dependency a project declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    /// A direct reference to a binary (`<Reference>`).
    Direct,
    /// A reference to another module of the build (`<ProjectReference>`).
    Module,
    /// A package manager reference (`<PackageReference>`).
    Package,
}

impl ReferenceKind {
    pub fn category(self) -> DiagnosticCategory {
        match self {
            ReferenceKind::Direct => DiagnosticCategory::DirectReference,
            ReferenceKind::Module => DiagnosticCategory::ModuleReference,
            ReferenceKind::Package => DiagnosticCategory::PackageReference,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Direct => "direct",
            ReferenceKind::Module => "module",
            ReferenceKind::Package => "package",
        }
    }

    /// Inverse of [`ReferenceKind::as_str`].
    pub fn parse(token: &str) -> Option<Self> {
        [Self::Direct, Self::Module, Self::Package]
            .into_iter()
            .find(|kind| kind.as_str() == token)
    }
}

/// One declared dependency of the analyzed project.
///
/// Package references produce one record per contributed module, all sharing the
/// package name as `label`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclaredReference {
    /// Resolved module path. Empty when the host could not resolve it.
    pub identity: String,
    pub kind: ReferenceKind,
    /// Human-facing label: the include spec or the package name.
    pub label: String,
}

impl DeclaredReference {
    pub fn new(identity: impl Into<String>, kind: ReferenceKind, label: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            kind,
            label: label.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.identity.trim().is_empty()
    }
}

/// A compile-time module contributed by a package.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContributedModule {
    /// Absolute path of the module file.
    pub path: String,
    /// Name declared in the module's own metadata.
    pub name: String,
}

impl ContributedModule {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub id: String,
    pub version: String,
    /// Ids of the packages this one depends on.
    pub dependencies: BTreeSet<String>,
    pub modules: BTreeSet<ContributedModule>,
    /// Build logic shipped by the package (props/targets files).
    pub build_files: BTreeSet<String>,
}

impl ResolvedPackage {
    pub fn has_build_logic(&self) -> bool {
        !self.build_files.is_empty()
    }
}

/// Modules the compiler reported as consumed.
///
/// Paths are normalized to forward slashes on the way in, and so are queries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsedModuleSet {
    paths: BTreeSet<String>,
    names: BTreeSet<String>,
}

impl UsedModuleSet {
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: paths
                .into_iter()
                .map(|p| normalize_module_path(p.as_ref()))
                .collect(),
            names: BTreeSet::new(),
        }
    }

    /// Attach the declared names of the used modules.
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.contains(&normalize_module_path(path))
    }

    /// A contributed module is used when its file is, or when a module with the
    /// same declared name is (the compiler may have picked another package's copy).
    pub fn contains_module(&self, module: &ContributedModule) -> bool {
        self.contains_path(&module.path) || self.names.contains(&module.name)
    }
}

pub fn normalize_module_path(path: &str) -> String {
    path.trim().replace('\\', "/")
}
