//! Typed errors for the session persistence boundary.
//!
//! Section start failures are not errors: they are reported through the
//! boolean result of `Assistant::start`. Only infrastructure failures on the
//! session file end up here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or saving the session record.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session file at {path} has format version {found}, newest supported is {supported}")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    #[error("Failed to serialize session record: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write session file at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session path {path} does not name a file")]
    InvalidPath { path: PathBuf },
}

impl SessionError {
    /// Path of the session file involved, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            SessionError::Read { path, .. }
            | SessionError::Corrupt { path, .. }
            | SessionError::UnsupportedVersion { path, .. }
            | SessionError::Write { path, .. }
            | SessionError::InvalidPath { path } => Some(path),
            SessionError::Serialize(_) => None,
        }
    }
}
