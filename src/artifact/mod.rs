//! Build artifacts that carry the version: manifests, version resources,
//! package names and checksum files.

pub mod hash;
pub mod manifest;

pub use hash::{write_hash_file, write_sha256_sidecar};
pub use manifest::{render_template, stamp_project_version};

use crate::domain::descriptor::sanitize;

/// `<name>-<version>.<extension>`, with the version made safe for file names
/// (feature branch versions may contain `/`).
pub fn package_file_name(name: &str, version: &str, extension: &str) -> String {
    let version = sanitize(version);
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        format!("{}-{}", name, version)
    } else {
        format!("{}-{}.{}", name, version, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_file_name() {
        assert_eq!(
            package_file_name("flasher_cli", "2.1.0-dev13-2", "zip"),
            "flasher_cli-2.1.0-dev13-2.zip"
        );
        assert_eq!(
            package_file_name("flasher_cli", "3.0.0", ".tar.gz"),
            "flasher_cli-3.0.0.tar.gz"
        );
        assert_eq!(package_file_name("lua5.1-flasher", "3.0.0", ""), "lua5.1-flasher-3.0.0");
    }

    #[test]
    fn test_package_file_name_sanitizes_version() {
        assert_eq!(
            package_file_name("flasher_cli", "2.1.0-feature/login-ga1b2c3d+", "zip"),
            "flasher_cli-2.1.0-feature_login-ga1b2c3d_.zip"
        );
    }
}
