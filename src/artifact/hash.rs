use crate::error::{Result, VersionError};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

const BUFFER_SIZE: usize = 64 * 1024;

/// Digests of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigests {
    pub md5: String,
    pub sha1: String,
    pub sha224: String,
    pub sha256: String,
    pub sha384: String,
    pub sha512: String,
}

impl FileDigests {
    /// `ALGO:hex` lines in the order of the hash file
    pub fn to_hash_file(&self) -> String {
        format!(
            "MD5:{}\nSHA1:{}\nSHA224:{}\nSHA256:{}\nSHA384:{}\nSHA512:{}\n",
            self.md5, self.sha1, self.sha224, self.sha256, self.sha384, self.sha512
        )
    }
}

/// Hex SHA-256 of a file
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    read_chunks(path, |chunk| hasher.update(chunk))?;
    Ok(hex::encode(hasher.finalize()))
}

/// All digests of a file in a single pass
pub fn digest_file(path: &Path) -> Result<FileDigests> {
    let mut md5 = Md5::new();
    let mut sha1 = Sha1::new();
    let mut sha224 = Sha224::new();
    let mut sha256 = Sha256::new();
    let mut sha384 = Sha384::new();
    let mut sha512 = Sha512::new();

    read_chunks(path, |chunk| {
        md5.update(chunk);
        sha1.update(chunk);
        sha224.update(chunk);
        sha256.update(chunk);
        sha384.update(chunk);
        sha512.update(chunk);
    })?;

    Ok(FileDigests {
        md5: hex::encode(md5.finalize()),
        sha1: hex::encode(sha1.finalize()),
        sha224: hex::encode(sha224.finalize()),
        sha256: hex::encode(sha256.finalize()),
        sha384: hex::encode(sha384.finalize()),
        sha512: hex::encode(sha512.finalize()),
    })
}

fn read_chunks(path: &Path, mut sink: impl FnMut(&[u8])) -> Result<()> {
    let mut file = File::open(path).map_err(|e| {
        VersionError::artifact(format!("cannot open '{}': {}", path.display(), e))
    })?;
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        sink(&buffer[..bytes_read]);
    }
    Ok(())
}

/// Write `<artifact>.sha256` containing `<hex digest> *<file name>`.
///
/// Returns the path of the sidecar file.
pub fn write_sha256_sidecar(artifact: &Path) -> Result<PathBuf> {
    let file_name = artifact
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            VersionError::artifact(format!("'{}' has no usable file name", artifact.display()))
        })?;

    let digest = sha256_file(artifact)?;
    let sidecar = artifact.with_file_name(format!("{}.sha256", file_name));
    fs::write(&sidecar, format!("{} *{}\n", digest, file_name))?;

    tracing::info!(artifact = %artifact.display(), sidecar = %sidecar.display(), "wrote sha256 sidecar");
    Ok(sidecar)
}

/// Resolve a path or glob pattern to exactly one existing file.
pub fn resolve_single(pattern: &str) -> Result<PathBuf> {
    let paths = glob::glob(pattern)
        .map_err(|e| VersionError::artifact(format!("invalid pattern '{}': {}", pattern, e)))?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| VersionError::artifact(e.to_string()))?;
        matches.push(path);
    }

    match matches.len() {
        0 => Err(VersionError::artifact(format!(
            "the input file '{}' does not exist",
            pattern
        ))),
        1 => Ok(matches.remove(0)),
        n => Err(VersionError::artifact(format!(
            "{} files match pattern '{}', expected one",
            n, pattern
        ))),
    }
}

/// Write a multi-digest hash file for the single file matching `input`.
///
/// The output defaults to `<input>.hash`. Returns the path written.
pub fn write_hash_file(input: &str, output: Option<&Path>) -> Result<PathBuf> {
    let artifact = resolve_single(input)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let mut name = artifact.clone().into_os_string();
            name.push(".hash");
            PathBuf::from(name)
        }
    };

    let digests = digest_file(&artifact)?;
    fs::write(&output, digests.to_hash_file())?;

    tracing::info!(artifact = %artifact.display(), output = %output.display(), "wrote hash file");
    Ok(output)
}
