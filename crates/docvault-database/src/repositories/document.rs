//! Document repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::document::{CreateDocument, Document};

/// Repository for document CRUD and per-folder queries.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a document by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// List the documents of one folder in upload order.
    pub async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE folder_id = ?1 ORDER BY rowid ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    /// Find a document by folder ID and title (for duplicate checking).
    pub async fn find_by_folder_and_title(
        &self,
        folder_id: Uuid,
        title: &str,
    ) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE folder_id = ?1 AND title = ?2")
            .bind(folder_id)
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find document by title", e)
            })
    }

    /// Create a new document record.
    ///
    /// Fails with `ConstraintViolation` when `folder_id` does not reference
    /// an existing folder.
    pub async fn create(&self, data: &CreateDocument) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, folder_id, title, file_path, content_type, size_bytes, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.folder_id)
        .bind(&data.title)
        .bind(&data.file_path)
        .bind(&data.content_type)
        .bind(data.size_bytes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::constraint_violation(format!(
                    "Folder {} does not exist",
                    data.folder_id
                ))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!(
                    "A document titled '{}' already exists in this folder",
                    data.title
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create document", e),
        })
    }

    /// Delete a document record.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Document {id} not found")));
        }
        Ok(())
    }
}
