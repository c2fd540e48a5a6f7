//! Application builder: wires router, middleware and state into an Axum app.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Multipart framing overhead allowed on top of the upload limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let max_body = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
}
