use crate::domain::{BranchKind, VersionDescriptor};
use crate::manager::ResolvedBranch;
use std::fmt;

/// Conditions worth telling the person running the build about that do not
/// stop the version from being derived.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Release build with commits after the release tag
    ReleaseAheadOfTag { tag: String, commits: u32 },
    /// Release build from a working tree with uncommitted changes
    DirtyWorkingTree { version: String },
    /// HEAD was detached; branch taken from a remote branch containing it
    DetachedHeadResolved { branch: String },
    /// HEAD was detached and no remote branch contains it
    DetachedHeadUnresolved { remote: String },
}

impl BoundaryWarning {
    /// Warnings for one resolution, in display order.
    pub fn collect(
        branch: &ResolvedBranch,
        descriptor: &VersionDescriptor,
        remote: &str,
    ) -> Vec<Self> {
        let mut warnings = Vec::new();

        if branch.detached {
            if branch.name == "HEAD" {
                warnings.push(BoundaryWarning::DetachedHeadUnresolved {
                    remote: remote.to_string(),
                });
            } else {
                warnings.push(BoundaryWarning::DetachedHeadResolved {
                    branch: branch.name.clone(),
                });
            }
        }

        if descriptor.branch_kind() == BranchKind::Release && descriptor.commits_since_tag() > 0 {
            warnings.push(BoundaryWarning::ReleaseAheadOfTag {
                tag: descriptor.governing_tag().to_string(),
                commits: descriptor.commits_since_tag(),
            });
        }

        if descriptor.dirty() && descriptor.branch_kind() == BranchKind::Release {
            warnings.push(BoundaryWarning::DirtyWorkingTree {
                version: descriptor.full_version().to_string(),
            });
        }

        warnings
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::ReleaseAheadOfTag { tag, commits } => write!(
                f,
                "Release branch is {} commit(s) ahead of tag '{}' - forgot to set a release tag?",
                commits, tag
            ),
            BoundaryWarning::DirtyWorkingTree { version } => write!(
                f,
                "Working tree has uncommitted changes, version '{}' is not reproducible",
                version
            ),
            BoundaryWarning::DetachedHeadResolved { branch } => write!(
                f,
                "HEAD is detached, using branch '{}' which contains the current commit",
                branch
            ),
            BoundaryWarning::DetachedHeadUnresolved { remote } => write!(
                f,
                "HEAD is detached and no branch of remote '{}' contains it, treating it as 'HEAD'",
                remote
            ),
        }
    }
}
