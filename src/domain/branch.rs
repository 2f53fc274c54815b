use crate::domain::VersionTag;
use crate::error::{Result, VersionError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

fn dev_branch_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^dev_v\d+\.\d+\.\d+$").expect("dev branch grammar is a valid regex")
    })
}

/// Classification of the branch a build runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    /// Production branch, tagged `vA.B.C`
    Release,
    /// Integration branch `dev_vA.B.C`, tagged `vA.B.C-devN`
    Dev,
    /// Anything else, e.g. feature branches
    Other,
}

impl BranchKind {
    /// Classify a resolved branch name. Release names win over the dev pattern.
    pub fn classify<S: AsRef<str>>(name: &str, release_branches: &[S]) -> Self {
        if release_branches.iter().any(|b| b.as_ref() == name) {
            BranchKind::Release
        } else if dev_branch_regex().is_match(name) {
            BranchKind::Dev
        } else {
            BranchKind::Other
        }
    }

    /// Check that a governing tag has the form this branch kind expects.
    pub fn validate_tag(&self, branch: &str, tag: &VersionTag) -> Result<()> {
        match (self, tag.is_dev()) {
            (BranchKind::Release, true) => Err(VersionError::inconsistent(format!(
                "got dev tag '{}' on release branch '{}' - forgot to set the release tag?",
                tag, branch
            ))),
            (BranchKind::Dev, false) => Err(VersionError::inconsistent(format!(
                "got release tag '{}' on dev branch '{}' - forgot to set the \"dev0\" tag?",
                tag, branch
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchKind::Release => write!(f, "release"),
            BranchKind::Dev => write!(f, "dev"),
            BranchKind::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE: &[&str] = &["master", "HEAD"];

    #[test]
    fn test_release_branches() {
        assert_eq!(BranchKind::classify("master", RELEASE), BranchKind::Release);
        assert_eq!(BranchKind::classify("HEAD", RELEASE), BranchKind::Release);
    }

    #[test]
    fn test_dev_branches() {
        assert_eq!(BranchKind::classify("dev_v2.1.0", RELEASE), BranchKind::Dev);
        assert_eq!(BranchKind::classify("dev_v10.0.12", RELEASE), BranchKind::Dev);
    }

    #[test]
    fn test_other_branches() {
        for name in [
            "feature/x",
            "main",
            "dev_v2.1",
            "dev_v2.1.0-fix",
            "xdev_v2.1.0",
            "dev_2.1.0",
            "origin/master",
            "",
        ] {
            assert_eq!(
                BranchKind::classify(name, RELEASE),
                BranchKind::Other,
                "{} should be Other",
                name
            );
        }
    }

    #[test]
    fn test_configured_release_set() {
        let release = vec!["main".to_string()];
        assert_eq!(BranchKind::classify("main", &release), BranchKind::Release);
        assert_eq!(BranchKind::classify("master", &release), BranchKind::Other);
    }

    #[test]
    fn test_validate_tag() {
        let dev = VersionTag::dev(2, 1, 0, 3);
        let release = VersionTag::release(2, 1, 0);

        assert!(BranchKind::Release.validate_tag("master", &release).is_ok());
        assert!(BranchKind::Dev.validate_tag("dev_v2.1.0", &dev).is_ok());
        assert!(BranchKind::Other.validate_tag("feature/x", &dev).is_ok());
        assert!(BranchKind::Other.validate_tag("feature/x", &release).is_ok());

        let err = BranchKind::Release.validate_tag("master", &dev).unwrap_err();
        assert!(matches!(err, VersionError::InconsistentTagBranchState(_)));
        assert!(err.to_string().contains("release tag"));

        let err = BranchKind::Dev.validate_tag("dev_v2.1.0", &release).unwrap_err();
        assert!(matches!(err, VersionError::InconsistentTagBranchState(_)));
        assert!(err.to_string().contains("dev0"));
    }

    #[test]
    fn test_display() {
        assert_eq!(BranchKind::Release.to_string(), "release");
        assert_eq!(BranchKind::Dev.to_string(), "dev");
        assert_eq!(BranchKind::Other.to_string(), "other");
    }
}
