//! Session persistence: one JSON file holding the data of every section.
//!
//! File layout:
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": "2026-10-16T09:12:44Z",
//!   "sections": [{"host": "localhost", "port": 8000}, {"path": "example.db"}]
//! }
//! ```
//!
//! A missing, empty or truncated file is a cold start. Anything else that
//! fails to parse is reported as corrupt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::SessionError;

/// Newest session file format this crate reads and the one it writes.
pub const SESSION_FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SESSION_FORMAT_VERSION
}

/// The persisted record: section data in section order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default = "default_version")]
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub sections: Vec<Value>,
}

impl SessionRecord {
    pub fn new(sections: Vec<Value>) -> Self {
        Self {
            version: SESSION_FORMAT_VERSION,
            saved_at: Utc::now(),
            sections,
        }
    }
}

/// Loads and saves the session record. Without a path every operation is a
/// no-op and `load` always reports a cold start.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Load the stored section data, or `None` for a cold start.
    pub fn load(&self) -> Result<Option<Vec<Value>>, SessionError> {
        Ok(self.load_record()?.map(|record| record.sections))
    }

    /// Load the full record including its envelope.
    pub fn load_record(&self) -> Result<Option<SessionRecord>, SessionError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };

        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No session file, cold start");
                return Ok(None);
            }
            Err(source) => {
                return Err(SessionError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            debug!(path = %path.display(), "Session file is empty, cold start");
            return Ok(None);
        }

        let record: SessionRecord = match serde_json::from_slice(&content) {
            Ok(record) => record,
            Err(e) if e.is_eof() => {
                warn!(path = %path.display(), error = %e, "Session file is truncated, ignoring it");
                return Ok(None);
            }
            Err(source) => {
                return Err(SessionError::Corrupt {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if record.version > SESSION_FORMAT_VERSION {
            return Err(SessionError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: record.version,
                supported: SESSION_FORMAT_VERSION,
            });
        }

        debug!(
            path = %path.display(),
            sections = record.sections.len(),
            "Loaded session"
        );
        Ok(Some(record))
    }

    /// Replace the stored record with `sections`.
    pub fn save(&self, sections: &[Value]) -> Result<(), SessionError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let record = SessionRecord::new(sections.to_vec());
        let json = serde_json::to_vec_pretty(&record).map_err(SessionError::Serialize)?;
        atomic_write(path, &json)?;

        debug!(path = %path.display(), sections = sections.len(), "Saved session");
        Ok(())
    }

    /// Delete the session file. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool, SessionError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(false);
        };

        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(SessionError::Write {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Write to a sibling `.tmp` file, then rename it over `dest`.
fn atomic_write(dest: &Path, bytes: &[u8]) -> Result<(), SessionError> {
    let Some(file_name) = dest.file_name() else {
        return Err(SessionError::InvalidPath {
            path: dest.to_path_buf(),
        });
    };

    let write_err = |path: &Path, source| SessionError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_err(parent, e))?;
    }

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = dest.with_file_name(tmp_name);

    fs::write(&tmp, bytes).map_err(|e| write_err(tmp.as_path(), e))?;

    if let Err(rename_err) = fs::rename(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(dest, rename_err));
    }

    Ok(())
}
