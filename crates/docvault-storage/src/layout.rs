//! Folder and document path layout under the storage root.
//!
//! Every folder is one directory directly below the root and every
//! document is one file inside its folder's directory:
//!
//! ```text
//! <root>/<folder name>/<file name>
//! ```
//!
//! Paths returned here are relative to the root. Names are used verbatim
//! as path segments, so anything that could escape the root or nest
//! deeper is rejected instead of rewritten.

use docvault_core::error::AppError;
use docvault_core::result::AppResult;

/// Longest accepted segment, in bytes (common filesystem name limit).
const MAX_SEGMENT_BYTES: usize = 255;

/// Relative path of a folder's directory.
pub fn folder_path(folder_name: &str) -> AppResult<String> {
    validate_segment("Folder name", folder_name)?;
    Ok(folder_name.to_string())
}

/// Relative path of a document inside its folder's directory.
pub fn document_path(folder_name: &str, file_name: &str) -> AppResult<String> {
    let folder = folder_path(folder_name)?;
    validate_segment("File name", file_name)?;
    Ok(format!("{folder}/{file_name}"))
}

/// Check that `name` is usable as exactly one path segment.
pub fn validate_segment(what: &str, name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation(format!("{what} cannot be empty")));
    }
    if name == "." || name == ".." {
        return Err(AppError::validation(format!("{what} '{name}' is reserved")));
    }
    if name.len() > MAX_SEGMENT_BYTES {
        return Err(AppError::validation(format!(
            "{what} exceeds {MAX_SEGMENT_BYTES} bytes"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| matches!(c, '/' | '\\') || c.is_control())
    {
        return Err(AppError::validation(format!(
            "{what} contains a forbidden character {bad:?}"
        )));
    }
    Ok(())
}
