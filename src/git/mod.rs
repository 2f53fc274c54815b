//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository queries
//! the version manager needs, allowing for a real implementation backed by
//! libgit2 and an in-memory implementation with an explicit commit graph for
//! tests.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! ```rust
//! # use flasher_version::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> flasher_version::Result<()> {
//! let head = repo.head()?;
//! for tag in repo.tags()? {
//!     if repo.is_ancestor_or_equal(tag.target, head.oid)? {
//!         let distance = repo.count_first_parent_commits(tag.target, head.oid)?;
//!         println!("{} is {} commits behind HEAD", tag.name, distance);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;
use std::collections::HashSet;

/// State of HEAD in the working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadState {
    /// Commit HEAD resolves to
    pub oid: Oid,
    /// Local branch name, `None` when HEAD is detached
    pub branch: Option<String>,
}

impl HeadState {
    pub fn is_detached(&self) -> bool {
        self.branch.is_none()
    }
}

/// A tag reference, peeled to the commit it marks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub target: Oid,
    /// Commit time of the target, seconds since the epoch
    pub time: i64,
}

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to
/// [crate::error::VersionError] variants.
pub trait Repository {
    /// Resolve HEAD to a commit and, if attached, its branch name.
    fn head(&self) -> Result<HeadState>;

    /// Remote-tracking branches of `remote` as `(short name, tip)` pairs,
    /// with the remote prefix stripped, sorted by name. Symbolic refs such as
    /// `origin/HEAD` are not included.
    fn remote_branches(&self, remote: &str) -> Result<Vec<(String, Oid)>>;

    /// All tags of the repository, peeled to commits, sorted by name.
    /// Tags that do not point at a commit are skipped.
    fn tags(&self) -> Result<Vec<TagRef>>;

    /// True if `ancestor` is `descendant` or reachable from it.
    fn is_ancestor_or_equal(&self, ancestor: Oid, descendant: Oid) -> Result<bool>;

    /// Every commit reachable from `tip`, `tip` included.
    fn reachable(&self, tip: Oid) -> Result<HashSet<Oid>>;

    /// Count commits reachable from `to` that are not reachable from `from`,
    /// following every parent (the `git describe` depth). Returns `None` as
    /// soon as the count exceeds `limit`.
    fn count_commits_between(
        &self,
        from: Oid,
        to: Oid,
        limit: Option<u32>,
    ) -> Result<Option<u32>>;

    /// Count commits reachable from `to` along the first-parent chain that
    /// are not reachable from `from`.
    fn count_first_parent_commits(&self, from: Oid, to: Oid) -> Result<u32>;

    /// True if tracked files differ from HEAD (in the index or the worktree).
    fn is_dirty(&self, include_untracked: bool) -> Result<bool>;

    /// Create an annotated tag `name` on `target`. Must fail if the name is
    /// already taken.
    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<()>;
}
