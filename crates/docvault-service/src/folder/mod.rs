//! Folder lifecycle service.

pub mod service;

pub use service::FolderService;
