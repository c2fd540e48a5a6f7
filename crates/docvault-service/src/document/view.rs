//! Inline document viewing.

use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::traits::storage::{BlobStore, ByteStream};
use docvault_database::repositories::document::DocumentRepository;
use docvault_entity::document::Document;

/// Characters left unescaped in an RFC 5987 `filename*` value.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// A document ready to be streamed to a client.
pub struct ViewResult {
    /// The document being viewed.
    pub document: Document,
    /// MIME type for the `Content-Type` header.
    pub content_type: String,
    /// File size for the `Content-Length` header.
    pub content_length: u64,
    /// Value for the `Content-Disposition` header.
    pub disposition: String,
    /// File content.
    pub stream: ByteStream,
}

impl std::fmt::Debug for ViewResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewResult")
            .field("document", &self.document)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("disposition", &self.disposition)
            .finish_non_exhaustive()
    }
}

/// Opens stored documents for inline display.
#[derive(Debug, Clone)]
pub struct ViewService {
    /// Document repository.
    document_repo: Arc<DocumentRepository>,
    /// Blob store.
    storage: Arc<dyn BlobStore>,
}

impl ViewService {
    /// Creates a new view service.
    pub fn new(document_repo: Arc<DocumentRepository>, storage: Arc<dyn BlobStore>) -> Self {
        Self {
            document_repo,
            storage,
        }
    }

    /// Opens a document's file.
    ///
    /// Fails with `FileMissing` when the row exists but the file does not.
    /// The row is left in place.
    pub async fn view(&self, document_id: Uuid) -> Result<ViewResult, AppError> {
        let document = self
            .document_repo
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {document_id} not found")))?;

        let missing = || {
            AppError::file_missing(format!(
                "File for document '{}' is missing from storage",
                document.title
            ))
        };

        if !self.storage.exists(&document.file_path).await? {
            return Err(missing());
        }

        let content_length = self
            .storage
            .size(&document.file_path)
            .await
            .map_err(|e| if e.kind == ErrorKind::NotFound { missing() } else { e })?;
        let stream = self
            .storage
            .read(&document.file_path)
            .await
            .map_err(|e| if e.kind == ErrorKind::NotFound { missing() } else { e })?;

        debug!(document_id = %document_id, size = content_length, "Opened document for viewing");

        Ok(ViewResult {
            content_type: document.content_type.clone(),
            content_length,
            disposition: inline_disposition(&document.title),
            document,
            stream,
        })
    }
}

/// Build an `inline` Content-Disposition value for a file name.
///
/// Names that are not plain printable ASCII get an ASCII fallback plus an
/// RFC 5987 `filename*` parameter.
pub fn inline_disposition(file_name: &str) -> String {
    let plain = file_name
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\');
    if plain {
        return format!("inline; filename=\"{file_name}\"");
    }

    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "inline; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(file_name, ATTR_CHAR)
    )
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::StreamExt;
    use uuid::Uuid;

    use docvault_core::error::ErrorKind;

    use super::*;
    use crate::document::UploadParams;
    use crate::test_support::vault;

    async fn collect(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[test]
    fn test_inline_disposition() {
        assert_eq!(inline_disposition("q1.pdf"), "inline; filename=\"q1.pdf\"");
        assert_eq!(
            inline_disposition("résumé.pdf"),
            "inline; filename=\"r_sum_.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"
        );
        assert_eq!(
            inline_disposition("a\"b.txt"),
            "inline; filename=\"a_b.txt\"; filename*=UTF-8''a%22b.txt"
        );
    }

    #[tokio::test]
    async fn test_view_returns_uploaded_bytes() {
        let vault = vault().await;
        let folder = vault.folders.create_folder("invoices").await.unwrap();
        let content = b"%PDF-1.4\n";
        let document = vault
            .uploads
            .upload(UploadParams {
                folder_id: folder.id,
                file_name: "q1.pdf".to_string(),
                data: Bytes::from_static(content),
            })
            .await
            .unwrap();

        let view = vault.views.view(document.id).await.unwrap();
        assert_eq!(view.document, document);
        assert_eq!(view.content_type, "application/pdf");
        assert_eq!(view.content_length, content.len() as u64);
        assert_eq!(view.disposition, "inline; filename=\"q1.pdf\"");
        assert_eq!(collect(view.stream).await, content);
    }

    #[tokio::test]
    async fn test_view_missing_document() {
        let vault = vault().await;

        let err = vault.views.view(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_view_externally_removed_file() {
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
        std::fs::remove_file(vault.storage_root().join("invoices/q1.pdf")).unwrap();

        let err = vault.views.view(document.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::FileMissing);
        assert_eq!(
            vault.documents.get_document(document.id).await.unwrap(),
            document
        );
    }
}
