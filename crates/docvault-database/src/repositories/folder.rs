//! Folder repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::folder::Folder;

/// Repository for folder CRUD and cascading deletion.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// List every folder in creation order.
    pub async fn find_all(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY rowid ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Create a new folder.
    pub async fn create(&self, name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, created_at) VALUES (?1, ?2, ?3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder '{name}' already exists"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    /// Delete a folder and every document that references it.
    ///
    /// Both deletes run in one transaction. Returns the number of document
    /// rows removed.
    pub async fn delete(&self, folder_id: Uuid) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let documents = sqlx::query("DELETE FROM documents WHERE folder_id = ?1")
            .bind(folder_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder documents", e)
            })?
            .rows_affected();

        let folders = sqlx::query("DELETE FROM folders WHERE id = ?1")
            .bind(folder_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder", e))?
            .rows_affected();

        if folders == 0 {
            // Dropping the transaction rolls it back.
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder delete", e)
        })?;

        debug!(%folder_id, documents, "Deleted folder rows");
        Ok(documents)
    }
}
