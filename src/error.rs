// Error taxonomy for sessions, rendering and exposition

use crate::schema::FieldGroup;

/// Failures raised by a telemetry session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The hardware interface could not be reached at open time.
    #[error("telemetry connection failed: {0}")]
    Connection(String),
    /// Reading the snapshot itself failed (distinct from a field missing inside it).
    #[error("telemetry read failed: {0}")]
    Read(String),
}

impl SessionError {
    pub(crate) fn read(context: &str, e: impl std::fmt::Display) -> Self {
        SessionError::Read(format!("{}: {}", context, e))
    }
}

/// A required-present field was absent from an otherwise live snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("required {group} field `{key}` is missing from the telemetry snapshot")]
    FieldMissing { group: FieldGroup, key: String },
}

/// Everything that can abort one scrape.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, thiserror::Error)]
pub enum ExpositionError {
    #[error("prometheus encoding failed: {0}")]
    Prometheus(#[from] prometheus::Error),
}
