//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// The folder that owns this document.
    pub folder_id: Uuid,
    /// Display name, normally the original upload file name.
    pub title: String,
    /// Path of the blob relative to the storage root.
    pub file_path: String,
    /// MIME type guessed from the title at upload time.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// When the document was uploaded.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new document record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// The folder to place the document in.
    pub folder_id: Uuid,
    /// Display name.
    pub title: String,
    /// Path of the blob relative to the storage root.
    pub file_path: String,
    /// MIME type.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
}
