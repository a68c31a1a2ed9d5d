//! Error types for manifest patching
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    /// the manifest file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// the manifest is not valid YAML
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing key `{path}`")]
    MissingKey { path: String },

    #[error("`{path}` is not a {expected}")]
    WrongType { path: String, expected: &'static str },

    /// a sequence has no element whose `field` equals `value`
    #[error("no entry in `{path}` with {field} == {value:?}")]
    MissingEntry {
        path: String,
        field: &'static str,
        value: String,
    },

    #[error("invalid version {version:?}: {reason}")]
    InvalidVersion { version: String, reason: &'static str },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("failed to load profile {}: {reason}", path.display())]
    Profile { path: PathBuf, reason: String },
}

pub type Result<T, E = PatchError> = std::result::Result<T, E>;
