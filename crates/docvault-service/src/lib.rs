//! # docvault-service
//!
//! Vault services for DocVault. Each service pairs the metadata
//! repositories with the blob store so that a folder or document only
//! exists when both its row and its file system entry exist.
//!
//! Creates touch the file system first and undo that work if the row
//! cannot be written. Deletes remove the row first and treat file system
//! cleanup as best effort.
//!
//! Dependencies are provided at construction time via `Arc` references.

pub mod document;
pub mod folder;

pub use document::{DocumentService, UploadParams, UploadService, ViewResult, ViewService};
pub use folder::FolderService;
