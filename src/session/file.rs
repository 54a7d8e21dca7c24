// Snapshot documents on disk: re-read and parsed on every scrape

use crate::error::SessionError;
use crate::models::TelemetrySnapshot;
use crate::session::TelemetrySession;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::instrument;

/// Session backed by a JSON snapshot document written by an external agent.
pub struct FileSession {
    path: PathBuf,
    opened: AtomicBool,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            opened: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<TelemetrySnapshot, String> {
        let s = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("{}: {}", self.path.display(), e))?;
        serde_json::from_str(&s).map_err(|e| format!("{}: {}", self.path.display(), e))
    }
}

impl TelemetrySession for FileSession {
    fn open(&self) -> Result<(), SessionError> {
        self.read().map_err(SessionError::Connection)?;
        self.opened.store(true, Ordering::Release);
        tracing::info!(path = %self.path.display(), "Snapshot file session opened");
        Ok(())
    }

    fn is_alive(&self) -> bool {
        self.opened.load(Ordering::Acquire) && self.path.exists()
    }

    #[instrument(skip(self), fields(session = "file", operation = "snapshot"))]
    fn snapshot(&self) -> Result<TelemetrySnapshot, SessionError> {
        self.read().map_err(SessionError::Read)
    }

    fn close(&self) -> Result<(), SessionError> {
        self.opened.store(false, Ordering::Release);
        Ok(())
    }
}
