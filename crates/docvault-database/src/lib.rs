//! # docvault-database
//!
//! SQLite connection management and concrete repository implementations
//! for folders and documents.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
