// tests/config_test.rs
use flasher_version::config::{load_config, Config, CONFIG_FILE_NAME};
use flasher_version::VersionError;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// Point the user config dir at an empty temporary directory.
fn isolated_config_home() -> TempDir {
    let home = tempfile::tempdir().unwrap();
    env::set_var("XDG_CONFIG_HOME", home.path());
    home
}

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.branches.release, vec!["master", "HEAD"]);
    assert_eq!(config.branches.remote, "origin");
    assert!(!config.describe.dirty_includes_untracked);
    assert_eq!(config.render.dirty_marker, "+");
    assert!(!config.render.sanitize_branch_names);
    assert_eq!(
        config.tagging.message,
        "Tag created automatically by flasher build process"
    );
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[branches]
release = ["master", "main", "HEAD"]
remote = "upstream"

[render]
dirty_marker = "-dirty"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path()), None).unwrap();
    assert_eq!(config.branches.release, vec!["master", "main", "HEAD"]);
    assert_eq!(config.branches.remote, "upstream");
    assert_eq!(config.render.dirty_marker, "-dirty");
    // untouched sections keep their defaults
    assert!(!config.describe.dirty_includes_untracked);
    assert_eq!(config.tagging, Config::default().tagging);
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[branches\nrelease = ").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path()), None).unwrap_err();
    assert!(matches!(err, VersionError::Config(_)));
}

#[test]
fn test_empty_release_list_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[branches]\nrelease = []\n").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path()), None).unwrap_err();
    assert!(err.to_string().contains("branches.release"));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(load_config(Some(&missing), None).is_err());
}

#[test]
#[serial]
fn test_repo_root_config_is_used() {
    let _home = isolated_config_home();
    let repo = tempfile::tempdir().unwrap();
    fs::write(
        repo.path().join(CONFIG_FILE_NAME),
        "[render]\nsanitize_branch_names = true\n",
    )
    .unwrap();

    let config = load_config(None, Some(repo.path())).unwrap();
    assert!(config.render.sanitize_branch_names);
}

#[test]
#[serial]
fn test_user_config_dir_fallback() {
    let home = isolated_config_home();
    fs::write(
        home.path().join(CONFIG_FILE_NAME),
        "[branches]\nremote = \"mirror\"\n",
    )
    .unwrap();
    let repo = tempfile::tempdir().unwrap();

    let config = load_config(None, Some(repo.path())).unwrap();
    assert_eq!(config.branches.remote, "mirror");
}

#[test]
#[serial]
fn test_repo_root_wins_over_user_config() {
    let home = isolated_config_home();
    fs::write(
        home.path().join(CONFIG_FILE_NAME),
        "[branches]\nremote = \"mirror\"\n",
    )
    .unwrap();
    let repo = tempfile::tempdir().unwrap();
    fs::write(
        repo.path().join(CONFIG_FILE_NAME),
        "[branches]\nremote = \"origin2\"\n",
    )
    .unwrap();

    let config = load_config(None, Some(repo.path())).unwrap();
    assert_eq!(config.branches.remote, "origin2");
}

#[test]
#[serial]
fn test_defaults_without_any_file() {
    let _home = isolated_config_home();
    let repo = tempfile::tempdir().unwrap();

    let config = load_config(None, Some(repo.path())).unwrap();
    assert_eq!(config, Config::default());
}
