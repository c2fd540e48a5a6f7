//! Route definitions for the DocVault HTTP API and pages.
//!
//! JSON routes are organized by domain and mounted under `/api`. The
//! browser pages live at the root. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route, bound to the given state.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(document_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes())
        .with_state(state)
}

/// Folder CRUD
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder).delete(handlers::folder::delete_folder),
        )
}

/// Document listing, upload, lookup, delete and inline view
fn document_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders/{id}/documents",
            get(handlers::document::list_documents).post(handlers::document::upload_document),
        )
        .route(
            "/documents/{id}",
            get(handlers::document::get_document).delete(handlers::document::delete_document),
        )
        .route("/documents/{id}/view", get(handlers::document::view_document))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Server-rendered pages and their form actions
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/folders", post(handlers::pages::create_folder))
        .route("/folders/{id}", get(handlers::pages::folder_detail))
        .route("/folders/{id}/upload", post(handlers::pages::upload_document))
        .route("/folders/{id}/delete", post(handlers::pages::delete_folder))
        .route("/documents/{id}/delete", post(handlers::pages::delete_document))
}
