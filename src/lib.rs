pub mod artifact;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manager;
pub mod ui;

pub use error::{Result, VersionError};
pub use manager::VersionManager;
