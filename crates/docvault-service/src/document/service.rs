//! Document lookup and deletion.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::traits::storage::BlobStore;
use docvault_database::repositories::document::DocumentRepository;
use docvault_database::repositories::folder::FolderRepository;
use docvault_entity::document::Document;

/// Manages document metadata and file cleanup.
#[derive(Debug, Clone)]
pub struct DocumentService {
    /// Document repository.
    document_repo: Arc<DocumentRepository>,
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Blob store.
    storage: Arc<dyn BlobStore>,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        document_repo: Arc<DocumentRepository>,
        folder_repo: Arc<FolderRepository>,
        storage: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            document_repo,
            folder_repo,
            storage,
        }
    }

    /// Lists the documents of a folder in upload order.
    pub async fn list_documents(&self, folder_id: Uuid) -> Result<Vec<Document>, AppError> {
        self.folder_repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;

        self.document_repo.find_by_folder(folder_id).await
    }

    /// Gets a document by ID.
    pub async fn get_document(&self, document_id: Uuid) -> Result<Document, AppError> {
        self.document_repo
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {document_id} not found")))
    }

    /// Deletes a document row, then its file.
    ///
    /// A file that cannot be removed is logged and otherwise ignored.
    pub async fn delete_document(&self, document_id: Uuid) -> Result<(), AppError> {
        let document = self.get_document(document_id).await?;

        self.document_repo.delete(document_id).await?;

        if let Err(e) = self.storage.remove(&document.file_path).await {
            warn!(
                document_id = %document_id,
                path = %document.file_path,
                error = %e,
                "Failed to remove document file"
            );
        }

        info!(
            document_id = %document_id,
            folder_id = %document.folder_id,
            title = %document.title,
            "Document deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use uuid::Uuid;

    use docvault_core::error::ErrorKind;

    use crate::document::UploadParams;
    use crate::test_support::vault;

    #[tokio::test]
    async fn test_list_and_get() {
        let vault = vault().await;
        let folder = vault.folders.create_folder("invoices").await.unwrap();
        let other = vault.folders.create_folder("receipts").await.unwrap();

        let mut uploaded = Vec::new();
        for (folder_id, name) in [(folder.id, "q1.pdf"), (folder.id, "q2.pdf"), (other.id, "r.txt")] {
            let document = vault
                .uploads
                .upload(UploadParams {
                    folder_id,
                    file_name: name.to_string(),
                    data: Bytes::from_static(b"content"),
                })
                .await
                .unwrap();
            uploaded.push(document);
        }

        let listed = vault.documents.list_documents(folder.id).await.unwrap();
        assert_eq!(listed, uploaded[..2].to_vec());
        assert!(vault.documents.list_documents(other.id).await.unwrap().len() == 1);
        assert_eq!(
            vault.documents.get_document(uploaded[2].id).await.unwrap(),
            uploaded[2]
        );
    }

    #[tokio::test]
    async fn test_missing_lookups() {
        let vault = vault().await;

        let err = vault
            .documents
            .list_documents(Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = vault
            .documents
            .get_document(Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_document_removes_row_and_file() {
        let vault = vault().await;
        let folder = vault.folders.create_folder("invoices").await.unwrap();
        let document = vault
            .uploads
            .upload(UploadParams {
                folder_id: folder.id,
                file_name: "q1.pdf".to_string(),
                data: Bytes::from_static(b"%PDF-1.4\n"),
            })
            .await
            .unwrap();

        vault.documents.delete_document(document.id).await.unwrap();

        assert!(vault.documents.list_documents(folder.id).await.unwrap().is_empty());
        assert!(!vault.storage_root().join("invoices/q1.pdf").exists());
        let err = vault
            .documents
            .delete_document(document.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_document_with_missing_file() {
        let vault = vault().await;
        let folder = vault.folders.create_folder("invoices").await.unwrap();
        let document = vault
            .uploads
            .upload(UploadParams {
                folder_id: folder.id,
                file_name: "gone.txt".to_string(),
                data: Bytes::from_static(b"bye"),
            })
            .await
            .unwrap();
        std::fs::remove_file(vault.storage_root().join("invoices/gone.txt")).unwrap();

        vault.documents.delete_document(document.id).await.unwrap();
        assert!(vault.documents.get_document(document.id).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_folder_removes_documents() {
        let vault = vault().await;
        let folder = vault.folders.create_folder("invoices").await.unwrap();
        let document = vault
            .uploads
            .upload(UploadParams {
                folder_id: folder.id,
                file_name: "q1.pdf".to_string(),
                data: Bytes::from_static(b"%PDF-1.4\n"),
            })
            .await
            .unwrap();

        vault.folders.delete_folder(folder.id).await.unwrap();

        let err = vault
            .documents
            .list_documents(folder.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(vault.documents.get_document(document.id).await.is_err());
        assert!(!vault.storage_root().join("invoices").exists());
    }
}
