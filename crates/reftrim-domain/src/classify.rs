//! Usage classification of declared references.

use crate::model::{DeclaredReference, ReferenceKind, UsedModuleSet};
use crate::policy::{PolicyError, build_globset, is_match};
use crate::transitive::PackageIndex;
use globset::GlobSet;
use std::collections::HashSet;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    Used,
    Removable,
    /// The package's own modules are unused, but modules of a package depending
    /// on it are. Removing it may still break that package's resolution.
    RemovableWithCaveat,
}

impl Classification {
    pub fn is_removable(self) -> bool {
        !matches!(self, Classification::Used)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Used => "used",
            Classification::Removable => "removable",
            Classification::RemovableWithCaveat => "removable_with_caveat",
        }
    }
}

/// Why a reference was left out of classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exclusion {
    /// Provided by the platform/toolchain.
    PlatformImplicit,
    /// Package contributes no modules, directly or through dependents.
    NoContributedModules,
    /// Package ships build logic whose necessity usage cannot tell.
    BuildLogic,
}

impl Exclusion {
    pub fn as_str(self) -> &'static str {
        match self {
            Exclusion::PlatformImplicit => "platform_implicit",
            Exclusion::NoContributedModules => "no_contributed_modules",
            Exclusion::BuildLogic => "build_logic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Classified(Classification),
    Excluded(Exclusion),
}

impl Status {
    pub fn classification(self) -> Option<Classification> {
        match self {
            Status::Classified(c) => Some(c),
            Status::Excluded(_) => None,
        }
    }
}

/// Outcome for one reference, or for one package group positioned at its first record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assessment<'a> {
    /// Declaration index of the (first) record.
    pub index: usize,
    pub reference: &'a DeclaredReference,
    pub status: Status,
}

/// Matcher for references the platform provides implicitly.
#[derive(Clone, Debug, Default)]
pub struct ImplicitReferences {
    set: Option<GlobSet>,
}

impl ImplicitReferences {
    pub fn new(patterns: &[String]) -> Result<Self, PolicyError> {
        Ok(Self {
            set: build_globset("implicit_references", patterns)?,
        })
    }

    /// Matches the label, the label's simple assembly name (text before the first
    /// comma), or the file stem of the resolved identity.
    pub fn matches(&self, reference: &DeclaredReference) -> bool {
        let Some(set) = self.set.as_ref() else {
            return false;
        };
        let simple_name = reference.label.split(',').next().unwrap_or("").trim();
        is_match(Some(set), &reference.label)
            || is_match(Some(set), simple_name)
            || identity_stem(&reference.identity).is_some_and(|stem| is_match(Some(set), stem))
    }
}

fn identity_stem(identity: &str) -> Option<&str> {
    let file = identity.rsplit(['/', '\\']).next()?;
    if file.is_empty() {
        return None;
    }
    match file.rsplit_once('.') {
        Some((stem, ext))
            if ext.eq_ignore_ascii_case("dll") || ext.eq_ignore_ascii_case("exe") =>
        {
            Some(stem)
        }
        _ => Some(file),
    }
}

/// Classify every declared reference in declaration order.
///
/// Package references are grouped by label; the group's assessment takes the
/// position of its first record.
pub fn classify<'a>(
    references: &'a [DeclaredReference],
    used: &UsedModuleSet,
    packages: &PackageIndex,
    implicit: &ImplicitReferences,
) -> Vec<Assessment<'a>> {
    let mut out = Vec::new();
    let mut seen_packages: HashSet<&str> = HashSet::new();

    for (index, reference) in references.iter().enumerate() {
        let status = match reference.kind {
            ReferenceKind::Direct => classify_module(reference, used, Some(implicit)),
            // Another project in the same build; never platform provided.
            ReferenceKind::Module => classify_module(reference, used, None),
            ReferenceKind::Package => {
                if !seen_packages.insert(reference.label.as_str()) {
                    continue;
                }
                classify_package(&reference.label, used, packages)
            }
        };
        out.push(Assessment {
            index,
            reference,
            status,
        });
    }

    out
}

fn classify_module(
    reference: &DeclaredReference,
    used: &UsedModuleSet,
    implicit: Option<&ImplicitReferences>,
) -> Status {
    if implicit.is_some_and(|implicit| implicit.matches(reference)) {
        return Status::Excluded(Exclusion::PlatformImplicit);
    }
    if !reference.is_resolved() {
        debug!(
            label = %reference.label,
            kind = reference.kind.as_str(),
            "reference identity could not be resolved; treating as used"
        );
        return Status::Classified(Classification::Used);
    }
    if used.contains_path(&reference.identity) {
        Status::Classified(Classification::Used)
    } else {
        Status::Classified(Classification::Removable)
    }
}

fn classify_package(label: &str, used: &UsedModuleSet, packages: &PackageIndex) -> Status {
    let Some(package) = packages.graph.find(label) else {
        debug!(package = %label, "package not found in lock manifest target; treating as used");
        return Status::Classified(Classification::Used);
    };

    if package.has_build_logic() {
        return Status::Excluded(Exclusion::BuildLogic);
    }
    if !packages.transitive.contains_package(&package.id) {
        return Status::Excluded(Exclusion::NoContributedModules);
    }

    let own_used = package.modules.iter().any(|m| used.contains_module(m));
    if own_used {
        return Status::Classified(Classification::Used);
    }

    let transitive_used = packages
        .transitive
        .modules_of(&package.id)
        .any(|m| used.contains_module(m));
    if transitive_used {
        Status::Classified(Classification::RemovableWithCaveat)
    } else {
        Status::Classified(Classification::Removable)
    }
}
