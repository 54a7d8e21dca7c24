// Telemetry session: the connection to the board's hardware telemetry source

mod file;
mod sysfs;

pub use file::FileSession;
pub use sysfs::SysfsSession;

use crate::config::{SessionBackend, SessionConfig};
use crate::error::SessionError;
use crate::models::TelemetrySnapshot;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Build the configured backend and open it.
pub fn connect(config: &SessionConfig) -> Result<SessionHandle, SessionError> {
    let session: Arc<dyn TelemetrySession> = match config.backend {
        SessionBackend::Sysfs => Arc::new(SysfsSession::new(config.root.clone())),
        SessionBackend::File => {
            let path = config.snapshot_path.clone().ok_or_else(|| {
                SessionError::Connection("file backend requires session.snapshot_path".into())
            })?;
            Arc::new(FileSession::new(path))
        }
    };
    SessionHandle::open(session)
}

/// A source of point-in-time board telemetry.
///
/// Implementations must tolerate concurrent `snapshot()` calls: scrapes may
/// overlap and the renderer adds no locking of its own.
pub trait TelemetrySession: Send + Sync {
    fn open(&self) -> Result<(), SessionError>;

    /// Non-blocking liveness check.
    fn is_alive(&self) -> bool;

    fn snapshot(&self) -> Result<TelemetrySnapshot, SessionError>;

    fn close(&self) -> Result<(), SessionError>;
}

/// Owns an opened session and releases it exactly once.
///
/// `close()` may be called from the shutdown path; if it never is (error
/// exit, panic unwinding), `Drop` closes instead. Once closed the handle
/// reports dead, so a late scrape renders nothing.
pub struct SessionHandle {
    inner: Arc<dyn TelemetrySession>,
    closed: AtomicBool,
}

impl SessionHandle {
    pub fn open(session: Arc<dyn TelemetrySession>) -> Result<Self, SessionError> {
        session.open()?;
        Ok(Self {
            inner: session,
            closed: AtomicBool::new(false),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close the underlying session. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::info!("Closing telemetry session");
        if let Err(e) = self.inner.close() {
            tracing::warn!(error = %e, operation = "close_session", "session close failed");
        }
    }
}

impl TelemetrySession for SessionHandle {
    /// Already open on construction; a closed handle cannot be reopened.
    fn open(&self) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::Connection(
                "telemetry session handle is closed".into(),
            ));
        }
        Ok(())
    }

    fn is_alive(&self) -> bool {
        !self.is_closed() && self.inner.is_alive()
    }

    fn snapshot(&self) -> Result<TelemetrySnapshot, SessionError> {
        self.inner.snapshot()
    }

    fn close(&self) -> Result<(), SessionError> {
        SessionHandle::close(self);
        Ok(())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.close();
    }
}
