use crate::error::{Result, VersionError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Numbers are plain decimals without leading zeros so that every accepted
/// name renders back to itself.
const NUMBER: &str = r"(0|[1-9][0-9]*)";

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^v{n}\.{n}\.{n}(?:-dev{n})?$", n = NUMBER))
            .expect("tag grammar is a valid regex")
    })
}

/// A parsed version tag name.
///
/// - `v2.1.0` -> `VersionTag::Release`
/// - `v2.1.0-dev13` -> `VersionTag::Dev`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionTag {
    Release { major: u32, minor: u32, patch: u32 },
    Dev { major: u32, minor: u32, patch: u32, dev: u32 },
}

impl VersionTag {
    pub fn release(major: u32, minor: u32, patch: u32) -> Self {
        VersionTag::Release {
            major,
            minor,
            patch,
        }
    }

    pub fn dev(major: u32, minor: u32, patch: u32, dev: u32) -> Self {
        VersionTag::Dev {
            major,
            minor,
            patch,
            dev,
        }
    }

    /// Parse a tag name, returning `None` for names outside the tag grammar.
    pub fn parse(name: &str) -> Option<Self> {
        let caps = tag_regex().captures(name)?;
        let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

        let (major, minor, patch) = (number(1)?, number(2)?, number(3)?);
        match caps.get(4) {
            Some(_) => Some(VersionTag::dev(major, minor, patch, number(4)?)),
            None => Some(VersionTag::release(major, minor, patch)),
        }
    }

    /// `(major, minor, patch)` of the tag
    pub fn triple(&self) -> (u32, u32, u32) {
        match *self {
            VersionTag::Release {
                major,
                minor,
                patch,
            }
            | VersionTag::Dev {
                major,
                minor,
                patch,
                ..
            } => (major, minor, patch),
        }
    }

    /// The bare "major.minor.patch" string used as the base of rendered versions.
    pub fn base_version(&self) -> String {
        let (major, minor, patch) = self.triple();
        format!("{}.{}.{}", major, minor, patch)
    }

    pub fn dev_number(&self) -> Option<u32> {
        match *self {
            VersionTag::Dev { dev, .. } => Some(dev),
            VersionTag::Release { .. } => None,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, VersionTag::Dev { .. })
    }

    /// Same base version with a different dev number.
    pub fn with_dev_number(&self, dev: u32) -> Self {
        let (major, minor, patch) = self.triple();
        VersionTag::dev(major, minor, patch, dev)
    }

    /// Semver view of the tag. Dev tags become pre-releases `dev.N` so that
    /// dev numbers compare numerically and every dev tag sorts below the
    /// release of the same version.
    pub fn to_semver(&self) -> semver::Version {
        let (major, minor, patch) = self.triple();
        let mut version = semver::Version::new(major.into(), minor.into(), patch.into());
        if let Some(dev) = self.dev_number() {
            // "dev.<digits>" is always a valid pre-release identifier
            version.pre = semver::Prerelease::new(&format!("dev.{}", dev))
                .unwrap_or(semver::Prerelease::EMPTY);
        }
        version
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionTag::Release { .. } => write!(f, "v{}", self.base_version()),
            VersionTag::Dev { dev, .. } => write!(f, "v{}-dev{}", self.base_version(), dev),
        }
    }
}

impl FromStr for VersionTag {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        VersionTag::parse(s).ok_or_else(|| {
            VersionError::config(format!(
                "'{}' is neither a release tag (vA.B.C) nor a dev tag (vA.B.C-devN)",
                s
            ))
        })
    }
}
