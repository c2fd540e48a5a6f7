//! Folder create, lookup and delete operations.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::traits::storage::BlobStore;
use docvault_database::repositories::folder::FolderRepository;
use docvault_entity::folder::Folder;
use docvault_storage::layout;

/// Manages folders and their backing directories.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Blob store holding one directory per folder.
    storage: Arc<dyn BlobStore>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folder_repo: Arc<FolderRepository>, storage: Arc<dyn BlobStore>) -> Self {
        Self {
            folder_repo,
            storage,
        }
    }

    /// Lists all folders in creation order.
    pub async fn list_folders(&self) -> Result<Vec<Folder>, AppError> {
        self.folder_repo.find_all().await
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: Uuid) -> Result<Folder, AppError> {
        self.folder_repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Creates a folder and its directory.
    ///
    /// The directory is created before the row. If the row cannot be
    /// written, a directory created by this call is removed again; one that
    /// was already there is left alone.
    pub async fn create_folder(&self, name: &str) -> Result<Folder, AppError> {
        let dir = layout::folder_path(name)?;

        let existed = self.storage.exists(&dir).await?;
        self.storage.ensure_dir(&dir).await?;

        let folder = match self.folder_repo.create(name).await {
            Ok(folder) => folder,
            Err(e) => {
                if !existed {
                    if let Err(cleanup) = self.storage.remove_tree(&dir).await {
                        warn!(
                            path = %dir,
                            error = %cleanup,
                            "Failed to remove directory after folder insert failed"
                        );
                    }
                }
                return Err(e);
            }
        };

        info!(folder_id = %folder.id, name = %folder.name, "Folder created");

        Ok(folder)
    }

    /// Deletes a folder, all of its documents and its directory.
    ///
    /// Rows go first, in one transaction. A directory that cannot be
    /// removed afterwards is logged and otherwise ignored.
    pub async fn delete_folder(&self, folder_id: Uuid) -> Result<(), AppError> {
        let folder = self.get_folder(folder_id).await?;

        let documents = self.folder_repo.delete(folder_id).await?;

        match layout::folder_path(&folder.name) {
            Ok(dir) => {
                if let Err(e) = self.storage.remove_tree(&dir).await {
                    warn!(
                        folder_id = %folder_id,
                        path = %dir,
                        error = %e,
                        "Failed to remove folder directory"
                    );
                }
            }
            Err(e) => warn!(folder_id = %folder_id, error = %e, "Folder name has no directory"),
        }

        info!(folder_id = %folder_id, name = %folder.name, documents, "Folder deleted");

        Ok(())
    }
}
