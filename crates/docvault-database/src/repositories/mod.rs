//! Repository implementations for folders and documents.

pub mod document;
pub mod folder;

pub use document::DocumentRepository;
pub use folder::FolderRepository;
