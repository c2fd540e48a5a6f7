//! Document upload service.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use docvault_core::config::StorageConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::traits::storage::{BlobStore, bytes_stream};
use docvault_database::repositories::document::DocumentRepository;
use docvault_database::repositories::folder::FolderRepository;
use docvault_entity::document::{CreateDocument, Document};
use docvault_storage::layout;

use super::guess_content_type;

/// Stores uploaded files and records them as documents.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Document repository.
    document_repo: Arc<DocumentRepository>,
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Blob store.
    storage: Arc<dyn BlobStore>,
    /// Storage configuration.
    config: StorageConfig,
}

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Target folder ID.
    pub folder_id: Uuid,
    /// Original file name; becomes the document title.
    pub file_name: String,
    /// File content bytes.
    pub data: Bytes,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        document_repo: Arc<DocumentRepository>,
        folder_repo: Arc<FolderRepository>,
        storage: Arc<dyn BlobStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            document_repo,
            folder_repo,
            storage,
            config,
        }
    }

    /// Writes the file into its folder's directory, then records it.
    ///
    /// The blob store never replaces an existing file, so a concurrent
    /// upload of the same title fails with `Conflict` before touching the
    /// file the other upload wrote. If the record cannot be written the
    /// file this call created is removed again and the insert error is
    /// returned.
    pub async fn upload(&self, params: UploadParams) -> Result<Document, AppError> {
        let folder = self
            .folder_repo
            .find_by_id(params.folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {} not found", params.folder_id)))?;

        let file_path = layout::document_path(&folder.name, &params.file_name)?;

        if self
            .document_repo
            .find_by_folder_and_title(folder.id, &params.file_name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A document titled '{}' already exists in folder '{}'",
                params.file_name, folder.name
            )));
        }

        let size = params.data.len() as u64;
        if size > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let written = self
            .storage
            .write_stream(&file_path, bytes_stream(params.data))
            .await
            .map_err(|e| {
                if e.kind == ErrorKind::Conflict {
                    AppError::conflict(format!(
                        "A document titled '{}' already exists in folder '{}'",
                        params.file_name, folder.name
                    ))
                } else {
                    e
                }
            })?;

        let create = CreateDocument {
            folder_id: folder.id,
            content_type: guess_content_type(&params.file_name),
            title: params.file_name,
            file_path,
            size_bytes: written as i64,
        };

        let document = match self.document_repo.create(&create).await {
            Ok(document) => document,
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&create.file_path).await {
                    warn!(
                        path = %create.file_path,
                        error = %cleanup,
                        "Failed to remove file after document insert failed"
                    );
                }
                return Err(e);
            }
        };

        info!(
            document_id = %document.id,
            folder_id = %folder.id,
            title = %document.title,
            size = written,
            "Document uploaded"
        );

        Ok(document)
    }
}
