//! Health check handler.

use axum::Json;
use axum::extract::State;

use docvault_database::connection::health_check;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database_ok = health_check(&state.db_pool).await.unwrap_or(false);
    let storage_ok = state.blob_store.health_check().await.unwrap_or(false);

    Json(ApiResponse::ok(HealthResponse {
        status: if database_ok && storage_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_ok { "connected" } else { "unavailable" }.to_string(),
        storage: if storage_ok { "available" } else { "unavailable" }.to_string(),
    }))
}
