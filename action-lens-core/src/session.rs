//! Session persistence
//!
//! The inspector keeps the selected record and the recorded actions across
//! restarts. The blob is opaque JSON; nothing else reads it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::ActionRecord;

/// Persisted inspector session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(rename = "selection", default)]
    pub selected_id: Option<i64>,
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {} is not a valid session: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where sessions are loaded from and saved to
pub trait SessionStore: Send {
    /// `Ok(None)` when nothing was saved yet
    fn load(&self) -> Result<Option<SessionSnapshot>, SessionError>;

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling written before the rename: `lens.json` -> `lens.json.tmp`
    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionSnapshot>, SessionError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        let snapshot =
            serde_json::from_str(&text).map_err(|source| SessionError::Format {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        let text = serde_json::to_string(snapshot)?;
        // atomic replace
        let tmp = self.tmp_path();
        std::fs::write(&tmp, text).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        tracing::debug!(
            path = %self.path.display(),
            actions = snapshot.actions.len(),
            "Session saved"
        );
        Ok(())
    }
}
