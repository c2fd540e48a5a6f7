//! # docvault-api
//!
//! HTTP layer for DocVault built on Axum.
//!
//! Serves the JSON API under `/api`, the server-rendered HTML pages at the
//! root, request logging and CORS middleware, and the mapping from
//! [`AppError`](docvault_core::AppError) to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod html;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
