//! Storage configuration.

use serde::{Deserialize, Serialize};

/// Local blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory; every folder is a subdirectory of it.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_root_path() -> String {
    "./storage".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}
