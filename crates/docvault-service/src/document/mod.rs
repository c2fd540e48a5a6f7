//! Document services: upload, lookup and deletion, inline viewing.

pub mod service;
pub mod upload;
pub mod view;

pub use service::DocumentService;
pub use upload::{UploadParams, UploadService};
pub use view::{ViewResult, ViewService};

/// Guess a MIME type from a file name, defaulting to `application/octet-stream`.
pub fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("q1.pdf"), "application/pdf");
        assert_eq!(guess_content_type("notes.txt"), "text/plain");
        assert_eq!(guess_content_type("photo.JPG"), "image/jpeg");
        assert_eq!(guess_content_type("README"), "application/octet-stream");
    }
}
