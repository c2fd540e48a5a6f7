//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::SqlitePool;

use docvault_core::config::AppConfig;
use docvault_core::traits::storage::BlobStore;
use docvault_database::repositories::{DocumentRepository, FolderRepository};
use docvault_service::{DocumentService, FolderService, UploadService, ViewService};

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database connection pool.
    pub db_pool: SqlitePool,
    /// Blob store holding folder directories and document files.
    pub blob_store: Arc<dyn BlobStore>,

    /// Folder service.
    pub folder_service: Arc<FolderService>,
    /// Upload service.
    pub upload_service: Arc<UploadService>,
    /// Document service.
    pub document_service: Arc<DocumentService>,
    /// View service.
    pub view_service: Arc<ViewService>,
}

impl AppState {
    /// Wires repositories and services on top of a pool and a blob store.
    pub fn new(config: AppConfig, db_pool: SqlitePool, blob_store: Arc<dyn BlobStore>) -> Self {
        let folder_repo = Arc::new(FolderRepository::new(db_pool.clone()));
        let document_repo = Arc::new(DocumentRepository::new(db_pool.clone()));

        let folder_service = Arc::new(FolderService::new(
            Arc::clone(&folder_repo),
            Arc::clone(&blob_store),
        ));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&document_repo),
            Arc::clone(&folder_repo),
            Arc::clone(&blob_store),
            config.storage.clone(),
        ));
        let document_service = Arc::new(DocumentService::new(
            Arc::clone(&document_repo),
            Arc::clone(&folder_repo),
            Arc::clone(&blob_store),
        ));
        let view_service = Arc::new(ViewService::new(document_repo, Arc::clone(&blob_store)));

        Self {
            config: Arc::new(config),
            db_pool,
            blob_store,
            folder_service,
            upload_service,
            document_service,
            view_service,
        }
    }
}
