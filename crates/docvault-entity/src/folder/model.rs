//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named container of documents, backed by a directory of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name; also the directory segment under the storage root.
    pub name: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}
