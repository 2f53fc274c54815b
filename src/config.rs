use crate::domain::RenderOptions;
use crate::error::{Result, VersionError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the repository root and the user config directory.
pub const CONFIG_FILE_NAME: &str = "flasher-version.toml";

/// Represents the complete configuration for flasher-version.
///
/// Contains branch classification, describe, rendering and tagging options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub describe: DescribeConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub tagging: TaggingConfig,
}

fn default_release_branches() -> Vec<String> {
    vec!["master".to_string(), "HEAD".to_string()]
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_dirty_marker() -> String {
    "+".to_string()
}

fn default_tag_message() -> String {
    "Tag created automatically by flasher build process".to_string()
}

/// Branch classification settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    /// Branch names treated as release branches. `HEAD` covers a detached
    /// checkout no remote branch contains.
    #[serde(default = "default_release_branches")]
    pub release: Vec<String>,

    /// Remote whose branches are searched when HEAD is detached
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            release: default_release_branches(),
            remote: default_remote(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct DescribeConfig {
    /// Count untracked files as making the working tree dirty
    #[serde(default)]
    pub dirty_includes_untracked: bool,
}

/// Configuration of the canonical version string.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_dirty_marker")]
    pub dirty_marker: String,

    #[serde(default)]
    pub sanitize_branch_names: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            dirty_marker: default_dirty_marker(),
            sanitize_branch_names: false,
        }
    }
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            dirty_marker: self.dirty_marker.clone(),
            sanitize_branch_names: self.sanitize_branch_names,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaggingConfig {
    /// Message of automatically created dev tags
    #[serde(default = "default_tag_message")]
    pub message: String,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        TaggingConfig {
            message: default_tag_message(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| VersionError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce unusable versions.
    pub fn validate(&self) -> Result<()> {
        if self.branches.release.is_empty() {
            return Err(VersionError::config(
                "branches.release must name at least one branch",
            ));
        }
        if self.branches.release.iter().any(|b| b.trim().is_empty()) {
            return Err(VersionError::config("branches.release contains an empty name"));
        }
        if self.branches.remote.trim().is_empty() {
            return Err(VersionError::config("branches.remote must not be empty"));
        }
        if self.render.dirty_marker.is_empty() {
            return Err(VersionError::config("render.dirty_marker must not be empty"));
        }
        if self.tagging.message.trim().is_empty() {
            return Err(VersionError::config("tagging.message must not be empty"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `flasher-version.toml` in the repository root
/// 3. `flasher-version.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `repo_root` - Working tree root of the repository being versioned
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, repo_root: Option<&Path>) -> Result<Config> {
    match locate_config(config_path, repo_root) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path).map_err(|e| {
                VersionError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&text)
                .map_err(|e| VersionError::config(format!("{}: {}", path.display(), e)))
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn locate_config(config_path: Option<&Path>, repo_root: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    if let Some(root) = repo_root {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.branches.release, vec!["master", "HEAD"]);
        assert_eq!(config.branches.remote, "origin");
        assert_eq!(config.render.dirty_marker, "+");
        assert!(!config.render.sanitize_branch_names);
        assert!(!config.describe.dirty_includes_untracked);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[render]
sanitize_branch_names = true
"#,
        )
        .unwrap();
        assert!(config.render.sanitize_branch_names);
        assert_eq!(config.render.dirty_marker, "+");
        assert_eq!(config.branches, BranchesConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_toml("[branches]\nrelease = []\n").is_err());
        assert!(Config::from_toml("[render]\ndirty_marker = \"\"\n").is_err());
        assert!(Config::from_toml("[tagging]\nmessage = \"  \"\n").is_err());
        assert!(Config::from_toml("[branches]\nrelease = \"master\"\n").is_err());
    }

    #[test]
    fn test_render_options() {
        let render = RenderConfig {
            dirty_marker: "-dirty".to_string(),
            sanitize_branch_names: true,
        };
        let options = render.options();
        assert_eq!(options.dirty_marker, "-dirty");
        assert!(options.sanitize_branch_names);
    }
}
