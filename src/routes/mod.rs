// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::metrics::SnapshotRenderer;
use crate::session::SessionHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) renderer: Arc<SnapshotRenderer>,
    pub(crate) session: Arc<SessionHandle>,
    pub(crate) metrics_path: Arc<str>,
}

pub fn app(
    renderer: Arc<SnapshotRenderer>,
    session: Arc<SessionHandle>,
    metrics_path: &str,
) -> Router {
    let state = AppState {
        renderer,
        session,
        metrics_path: Arc::from(metrics_path),
    };
    Router::new()
        .route("/", get(http::root_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route(metrics_path, get(http::metrics_handler)) // GET /metrics
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
