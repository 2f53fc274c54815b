//! Version derivation from repository branch and tag state.
//!
//! The manager classifies the current branch, finds the governing tag on the
//! ancestry of HEAD, counts commits since that tag and renders the canonical
//! version string. It can also mint the next `vA.B.C-devN` tag on a dev
//! branch.

use crate::config::Config;
use crate::domain::{BranchKind, VersionDescriptor, VersionTag};
use crate::error::{Result, VersionError};
use crate::git::{Git2Repository, HeadState, Repository};
use git2::Oid;
use std::cmp::Reverse;
use std::path::Path;
use tracing::{debug, info, warn, Span};

/// The tag a version is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoverningTag {
    pub tag: VersionTag,
    pub name: String,
    /// Commit the tag marks
    pub commit: Oid,
    /// Commits reachable from HEAD but not from the tag, side branches
    /// included
    pub distance: u32,
}

/// The resolved branch of the working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBranch {
    pub name: String,
    pub kind: BranchKind,
    /// Set when HEAD was detached and the name came from a remote branch
    /// (or fell back to `HEAD`)
    pub detached: bool,
}

/// A dev tag that `create_dev_tag` would write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevTagPlan {
    pub tag: VersionTag,
    pub previous: GoverningTag,
    pub head: Oid,
}

/// Derives versions from one working copy.
pub struct VersionManager<R: Repository> {
    repo: R,
    config: Config,
    span: Span,
}

impl VersionManager<Git2Repository> {
    /// Open the repository containing `path`.
    pub fn open<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        Self::open_with(path, |_| Ok(config))
    }

    /// Open the repository containing `path` and obtain its configuration
    /// from `load`, which is given the root of the working tree.
    pub fn open_with<P, F>(path: P, load: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: FnOnce(Option<&Path>) -> Result<Config>,
    {
        let path = path.as_ref();
        let repo = Git2Repository::open(path)?;
        let config = load(repo.workdir())?;
        let span = tracing::info_span!("version_manager", repo = %path.display());
        Ok(VersionManager::new(repo, config).with_span(span))
    }
}

impl<R: Repository> VersionManager<R> {
    pub fn new(repo: R, config: Config) -> Self {
        VersionManager {
            repo,
            config,
            span: tracing::info_span!("version_manager"),
        }
    }

    /// Use `span` as the logging context of every operation.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the branch name and its kind.
    ///
    /// A detached HEAD takes the name of the first remote branch (by name)
    /// whose tip is HEAD or a descendant of it; without one the name is
    /// `HEAD`.
    pub fn resolve_branch(&self) -> Result<ResolvedBranch> {
        let _enter = self.span.enter();
        let head = self.repo.head()?;
        self.resolve_branch_at(&head)
    }

    /// Classify the current branch.
    pub fn classify_branch(&self) -> Result<BranchKind> {
        Ok(self.resolve_branch()?.kind)
    }

    /// Find the tag the current version is based on.
    pub fn resolve_governing_tag(&self) -> Result<GoverningTag> {
        let _enter = self.span.enter();
        let head = self.repo.head()?;
        let branch = self.resolve_branch_at(&head)?;
        self.governing_tag_at(&head, &branch)
    }

    /// Count first-parent commits from `tag` (exclusive) to HEAD (inclusive).
    pub fn count_commits_since(&self, tag: &GoverningTag) -> Result<u32> {
        let _enter = self.span.enter();
        let head = self.repo.head()?;
        self.repo.count_first_parent_commits(tag.commit, head.oid)
    }

    /// Resolve everything once and return the version descriptor.
    pub fn describe(&self) -> Result<VersionDescriptor> {
        let _enter = self.span.enter();
        let head = self.repo.head()?;
        let branch = self.resolve_branch_at(&head)?;
        let governing = self.governing_tag_at(&head, &branch)?;
        let commits = self
            .repo
            .count_first_parent_commits(governing.commit, head.oid)?;
        let dirty = self
            .repo
            .is_dirty(self.config.describe.dirty_includes_untracked)?;

        let descriptor = VersionDescriptor::new(
            branch.name,
            branch.kind,
            &governing.tag,
            commits,
            dirty,
            &head.oid.to_string(),
            &self.config.render.options(),
        );
        info!(version = descriptor.full_version(), "derived version");
        Ok(descriptor)
    }

    /// The canonical version string of the working copy.
    pub fn render_version_string(&self) -> Result<String> {
        Ok(self.describe()?.full_version().to_string())
    }

    /// Compute the next dev tag without writing it.
    pub fn plan_dev_tag(&self) -> Result<DevTagPlan> {
        let _enter = self.span.enter();
        let head = self.repo.head()?;
        let branch = self.resolve_branch_at(&head)?;
        if branch.kind != BranchKind::Dev {
            return Err(VersionError::NotOnDevBranch(branch.name));
        }

        let previous = self.governing_tag_at(&head, &branch)?;
        if previous.commit == head.oid {
            return Err(VersionError::TagAlreadyAtHead {
                tag: previous.name,
                commit: head.oid.to_string(),
            });
        }

        // Dev branches only ever resolve to dev tags
        let last_dev = previous.tag.dev_number().ok_or_else(|| {
            VersionError::inconsistent(format!("'{}' is not a dev tag", previous.name))
        })?;
        let commits = self.repo.count_first_parent_commits(previous.commit, head.oid)?;
        let next = last_dev.checked_add(commits).ok_or_else(|| {
            VersionError::inconsistent(format!("dev number overflow after '{}'", previous.name))
        })?;

        Ok(DevTagPlan {
            tag: previous.tag.with_dev_number(next),
            previous,
            head: head.oid,
        })
    }

    /// Create the next dev tag on HEAD.
    ///
    /// The new dev number is the governing tag's number plus the commits
    /// since it. Not atomic with respect to other processes tagging the same
    /// repository.
    pub fn create_dev_tag(&self) -> Result<VersionTag> {
        let plan = self.plan_dev_tag()?;
        let _enter = self.span.enter();

        let name = plan.tag.to_string();
        self.repo
            .create_annotated_tag(&name, plan.head, &self.config.tagging.message)?;
        info!(tag = %name, previous = %plan.previous.name, commit = %plan.head, "created dev tag");
        Ok(plan.tag)
    }

    fn resolve_branch_at(&self, head: &HeadState) -> Result<ResolvedBranch> {
        let detached = head.is_detached();
        let name = match &head.branch {
            Some(name) => name.clone(),
            None => self.branch_containing(head.oid)?,
        };
        let kind = BranchKind::classify(&name, &self.config.branches.release);
        debug!(branch = %name, kind = %kind, detached, "resolved branch");
        Ok(ResolvedBranch {
            name,
            kind,
            detached,
        })
    }

    fn branch_containing(&self, oid: Oid) -> Result<String> {
        let remote = &self.config.branches.remote;
        for (name, tip) in self.repo.remote_branches(remote)? {
            if self.repo.is_ancestor_or_equal(oid, tip)? {
                debug!(branch = %name, remote = %remote, "detached HEAD is contained in remote branch");
                return Ok(name);
            }
        }
        warn!(remote = %remote, "detached HEAD is not contained in any remote branch");
        Ok("HEAD".to_string())
    }

    fn governing_tag_at(&self, head: &HeadState, branch: &ResolvedBranch) -> Result<GoverningTag> {
        let tags = self.repo.tags()?;
        let history = self.repo.reachable(head.oid)?;

        let mut on_history: Vec<_> = tags
            .iter()
            .filter_map(|tag_ref| match VersionTag::parse(&tag_ref.name) {
                Some(tag) => Some((tag_ref, tag)),
                None => {
                    debug!(tag = %tag_ref.name, "ignoring tag outside the version grammar");
                    None
                }
            })
            .filter(|(tag_ref, _)| history.contains(&tag_ref.target))
            .collect();
        // Newest first, so the depth bound shrinks early
        on_history.sort_by_key(|(tag_ref, _)| Reverse(tag_ref.time));

        let mut nearest: Option<u32> = None;
        let mut candidates = Vec::new();
        for (tag_ref, tag) in on_history {
            let bounded = self
                .repo
                .count_commits_between(tag_ref.target, head.oid, nearest)?;
            let Some(distance) = bounded else {
                continue;
            };
            nearest = Some(nearest.map_or(distance, |n| n.min(distance)));
            candidates.push((tag_ref, tag, distance));
        }

        // Nearest first, then newest, then highest version
        candidates.sort_by_key(|(tag_ref, tag, distance)| {
            (*distance, Reverse(tag_ref.time), Reverse(tag.to_semver()))
        });

        let Some((best_ref, best_tag, distance)) = candidates.first() else {
            return Err(VersionError::no_tag(format!(
                "no tag matching vA.B.C or vA.B.C-devN is reachable from HEAD ({})",
                head.oid
            )));
        };

        // Distinct names never tie on all keys, so a tie means a duplicated name
        let matches = tags.iter().filter(|t| t.name == best_ref.name).count();
        if matches != 1 {
            return Err(VersionError::ambiguous(format!(
                "tag name '{}' matches {} tag objects",
                best_ref.name, matches
            )));
        }

        branch.kind.validate_tag(&branch.name, best_tag)?;

        debug!(tag = %best_ref.name, distance = *distance, "resolved governing tag");
        Ok(GoverningTag {
            tag: *best_tag,
            name: best_ref.name.clone(),
            commit: best_ref.target,
            distance: *distance,
        })
    }
}
