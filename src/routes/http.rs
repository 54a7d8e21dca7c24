// GET handlers: root, version, metrics

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use super::AppState;
use crate::error::{ExpositionError, ScrapeError};
use crate::metrics::exposition;
use crate::version::{NAME, VERSION, banner};

/// Scrape failure; the renderer and session errors surface as a 500.
#[derive(Debug, thiserror::Error)]
pub(super) enum MetricsError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    #[error(transparent)]
    Encode(#[from] ExpositionError),
    #[error("scrape task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, operation = "scrape", "scrape failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// GET /: plain-text banner.
pub(super) async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    banner(&state.metrics_path)
}

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /metrics: one render pass over a fresh snapshot, Prometheus text format.
#[instrument(skip(state), fields(operation = "metrics"))]
pub(super) async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MetricsError> {
    let renderer = state.renderer.clone();
    let session = state.session.clone();
    let families =
        tokio::task::spawn_blocking(move || renderer.scrape(session.as_ref())).await??;

    tracing::debug!(families = families.len(), "scrape rendered");
    let body = exposition::encode(&families)?;
    Ok(([(header::CONTENT_TYPE, exposition::CONTENT_TYPE)], body))
}
