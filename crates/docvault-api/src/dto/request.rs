//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use docvault_core::error::AppError;

/// Create folder request body, used by both the JSON API and the HTML form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name; becomes the directory name under the storage root.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: String,
}

/// Run `validator` checks and map failures to a validation error.
pub fn validate_request<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}
