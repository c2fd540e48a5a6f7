//! # docvault-entity
//!
//! Domain entity models for DocVault. Every struct in this crate
//! represents a database table row or the data needed to insert one.
//! Row types derive `sqlx::FromRow`.

pub mod document;
pub mod folder;

pub use document::{CreateDocument, Document};
pub use folder::Folder;
