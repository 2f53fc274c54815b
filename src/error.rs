use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for flasher-version operations.
///
/// Every variant is fatal: a version string is either fully derived or the
/// calling build step stops.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found at '{path}': {reason}")]
    RepositoryNotFound { path: PathBuf, reason: String },

    #[error("Inconsistent tag/branch state: {0}")]
    InconsistentTagBranchState(String),

    #[error("No governing tag found: {0}")]
    NoGoverningTagFound(String),

    #[error("Ambiguous tag lookup: {0}")]
    AmbiguousTagLookup(String),

    #[error("Not on a dev branch: current branch is '{0}'")]
    NotOnDevBranch(String),

    #[error("Tag '{tag}' already points at HEAD ({commit})")]
    TagAlreadyAtHead { tag: String, commit: String },

    #[error("Could not create tag '{tag}' on commit '{commit}': {reason}")]
    TagCreationFailed {
        tag: String,
        commit: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in flasher-version
pub type Result<T> = std::result::Result<T, VersionError>;

impl VersionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersionError::Config(msg.into())
    }

    /// Create an artifact error with context
    pub fn artifact(msg: impl Into<String>) -> Self {
        VersionError::Artifact(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        VersionError::InconsistentTagBranchState(msg.into())
    }

    pub fn no_tag(msg: impl Into<String>) -> Self {
        VersionError::NoGoverningTagFound(msg.into())
    }

    pub fn ambiguous(msg: impl Into<String>) -> Self {
        VersionError::AmbiguousTagLookup(msg.into())
    }

    /// True for errors caused by the repository's tag/branch layout rather
    /// than by the environment. These need a human to fix the tags.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            VersionError::InconsistentTagBranchState(_)
                | VersionError::NotOnDevBranch(_)
                | VersionError::NoGoverningTagFound(_)
                | VersionError::AmbiguousTagLookup(_)
                | VersionError::TagAlreadyAtHead { .. }
        )
    }
}
