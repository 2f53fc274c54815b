//! The version descriptor and the canonical version string rules.

use crate::domain::{BranchKind, VersionTag};
use serde::Serialize;

/// Number of hex characters of the HEAD hash embedded in versions.
pub const SHORT_HASH_LEN: usize = 7;

/// Options that change how the canonical string is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Appended to every rendered version when the working tree is dirty
    pub dirty_marker: String,
    /// Replace filename-unsafe characters in feature branch names with `_`
    pub sanitize_branch_names: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            dirty_marker: "+".to_string(),
            sanitize_branch_names: false,
        }
    }
}

/// Result of one version resolution. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDescriptor {
    base_version: String,
    branch: String,
    branch_kind: BranchKind,
    governing_tag: String,
    dev_number: Option<u32>,
    commits_since_tag: u32,
    dirty: bool,
    short_hash: String,
    full_version: String,
}

impl VersionDescriptor {
    /// Assemble a descriptor and render its canonical version string.
    pub fn new(
        branch: impl Into<String>,
        branch_kind: BranchKind,
        tag: &VersionTag,
        commits_since_tag: u32,
        dirty: bool,
        head_hash: &str,
        options: &RenderOptions,
    ) -> Self {
        let branch = branch.into();
        let short_hash: String = head_hash.chars().take(SHORT_HASH_LEN).collect();
        let full_version = render(
            branch_kind,
            tag,
            commits_since_tag,
            &branch,
            &short_hash,
            dirty,
            options,
        );

        VersionDescriptor {
            base_version: tag.base_version(),
            branch,
            branch_kind,
            governing_tag: tag.to_string(),
            dev_number: tag.dev_number(),
            commits_since_tag,
            dirty,
            short_hash,
            full_version,
        }
    }

    pub fn base_version(&self) -> &str {
        &self.base_version
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn branch_kind(&self) -> BranchKind {
        self.branch_kind
    }

    pub fn governing_tag(&self) -> &str {
        &self.governing_tag
    }

    pub fn dev_number(&self) -> Option<u32> {
        self.dev_number
    }

    pub fn commits_since_tag(&self) -> u32 {
        self.commits_since_tag
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn short_hash(&self) -> &str {
        &self.short_hash
    }

    pub fn full_version(&self) -> &str {
        &self.full_version
    }
}

impl std::fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_version)
    }
}

/// Render the canonical version string.
///
/// | kind    | rule                                   |
/// |---------|----------------------------------------|
/// | Release | `base` or `base-N` when N > 0          |
/// | Dev     | `base-devD-N`                          |
/// | Other   | `base-<branch>-g<hash>`                |
///
/// The dirty marker is appended on every kind when the tree is dirty.
pub fn render(
    kind: BranchKind,
    tag: &VersionTag,
    commits_since_tag: u32,
    branch: &str,
    short_hash: &str,
    dirty: bool,
    options: &RenderOptions,
) -> String {
    let base = tag.base_version();

    let mut version = match (kind, tag.dev_number()) {
        (BranchKind::Dev, Some(dev)) => format!("{}-dev{}-{}", base, dev, commits_since_tag),
        (BranchKind::Release, _) | (BranchKind::Dev, None) => {
            if commits_since_tag == 0 {
                base
            } else {
                format!("{}-{}", base, commits_since_tag)
            }
        }
        (BranchKind::Other, _) => {
            let branch = if options.sanitize_branch_names {
                sanitize(branch)
            } else {
                branch.to_string()
            };
            format!("{}-{}-g{}", base, branch, short_hash)
        }
    };

    if dirty {
        version.push_str(&options.dirty_marker);
    }
    version
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> RenderOptions {
        RenderOptions::default()
    }

    #[test]
    fn test_render_release_at_tag() {
        let tag = VersionTag::release(3, 0, 0);
        let v = render(BranchKind::Release, &tag, 0, "master", "abcdef0", false, &opts());
        assert_eq!(v, "3.0.0");
    }

    #[test]
    fn test_render_release_ahead_of_tag() {
        let tag = VersionTag::release(3, 0, 0);
        let v = render(BranchKind::Release, &tag, 4, "master", "abcdef0", false, &opts());
        assert_eq!(v, "3.0.0-4");
    }

    #[test]
    fn test_render_dev() {
        let tag = VersionTag::dev(2, 1, 0, 13);
        let v = render(BranchKind::Dev, &tag, 2, "dev_v2.1.0", "abcdef0", false, &opts());
        assert_eq!(v, "2.1.0-dev13-2");

        let v = render(BranchKind::Dev, &tag, 0, "dev_v2.1.0", "abcdef0", false, &opts());
        assert_eq!(v, "2.1.0-dev13-0");
    }

    #[test]
    fn test_render_feature_branch() {
        let tag = VersionTag::release(2, 1, 0);
        let v = render(
            BranchKind::Other,
            &tag,
            7,
            "feature/login",
            "a1b2c3d",
            true,
            &opts(),
        );
        assert_eq!(v, "2.1.0-feature/login-ga1b2c3d+");
    }

    #[test]
    fn test_dirty_marker_on_every_kind() {
        let dev = VersionTag::dev(2, 1, 0, 13);
        let rel = VersionTag::release(3, 0, 0);
        assert_eq!(
            render(BranchKind::Release, &rel, 0, "master", "a1b2c3d", true, &opts()),
            "3.0.0+"
        );
        assert_eq!(
            render(BranchKind::Release, &rel, 1, "master", "a1b2c3d", true, &opts()),
            "3.0.0-1+"
        );
        assert_eq!(
            render(BranchKind::Dev, &dev, 2, "dev_v2.1.0", "a1b2c3d", true, &opts()),
            "2.1.0-dev13-2+"
        );
    }

    #[test]
    fn test_custom_dirty_marker_and_sanitizing() {
        let options = RenderOptions {
            dirty_marker: "-dirty".to_string(),
            sanitize_branch_names: true,
        };
        let tag = VersionTag::release(2, 1, 0);
        let v = render(
            BranchKind::Other,
            &tag,
            0,
            "feature/login#2",
            "a1b2c3d",
            true,
            &options,
        );
        assert_eq!(v, "2.1.0-feature_login_2-ga1b2c3d-dirty");
    }

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize("fix-1.2_x"), "fix-1.2_x");
        assert_eq!(sanitize("a/b c"), "a_b_c");
    }

    #[test]
    fn test_descriptor_fields() {
        let tag = VersionTag::dev(2, 1, 0, 13);
        let d = VersionDescriptor::new(
            "dev_v2.1.0",
            BranchKind::Dev,
            &tag,
            2,
            false,
            "b39e454f00dfeed00dfeed00dfeed00dfeed0000",
            &opts(),
        );
        assert_eq!(d.base_version(), "2.1.0");
        assert_eq!(d.governing_tag(), "v2.1.0-dev13");
        assert_eq!(d.dev_number(), Some(13));
        assert_eq!(d.short_hash(), "b39e454");
        assert_eq!(d.full_version(), "2.1.0-dev13-2");
        assert_eq!(d.to_string(), "2.1.0-dev13-2");
    }

    #[test]
    fn test_descriptor_serializes() {
        let tag = VersionTag::release(3, 0, 0);
        let d = VersionDescriptor::new(
            "master",
            BranchKind::Release,
            &tag,
            0,
            false,
            "0123456789abcdef0123456789abcdef01234567",
            &opts(),
        );
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["full_version"], "3.0.0");
        assert_eq!(json["branch_kind"], "release");
        assert_eq!(json["dev_number"], serde_json::Value::Null);
    }
}
