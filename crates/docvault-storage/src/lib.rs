//! # docvault-storage
//!
//! Maps folder and file names onto storage paths and implements the
//! [`BlobStore`](docvault_core::traits::BlobStore) trait for the local
//! filesystem.

pub mod layout;
pub mod providers;

pub use layout::{document_path, folder_path};
pub use providers::LocalBlobStore;
