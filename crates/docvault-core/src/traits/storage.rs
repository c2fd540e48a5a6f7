//! Blob store trait for the physical side of the vault.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading and writing file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Wrap an in-memory buffer as a single-chunk [`ByteStream`].
pub fn bytes_stream(data: impl Into<Bytes>) -> ByteStream {
    let chunk: Result<Bytes, std::io::Error> = Ok(data.into());
    Box::pin(futures::stream::iter([chunk]))
}

/// Trait for blob storage backends.
///
/// Paths are relative to the backend's root and use `/` as the separator.
/// The trait is defined here in `docvault-core` and implemented in
/// `docvault-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Check whether the backend is reachable and its root is usable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Create a directory (and any missing parents). Idempotent.
    async fn ensure_dir(&self, path: &str) -> AppResult<()>;

    /// Write a byte stream to a new file at `path`.
    ///
    /// Returns the number of bytes written. An existing file at `path` is
    /// never replaced: the write fails with `Conflict` and the existing
    /// file is left untouched. A failed write never leaves a partial file
    /// at `path`.
    async fn write_stream(&self, path: &str, stream: ByteStream) -> AppResult<u64>;

    /// Open the file at `path` as a byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Delete a single file. A missing file is not an error.
    async fn remove(&self, path: &str) -> AppResult<()>;

    /// Delete a directory and everything beneath it. A missing directory is
    /// not an error.
    async fn remove_tree(&self, path: &str) -> AppResult<()>;

    /// Check whether a file or directory exists at `path`.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Size in bytes of the file at `path`.
    async fn size(&self, path: &str) -> AppResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_bytes_stream_yields_single_chunk() {
        let mut stream = bytes_stream(&b"%PDF-1.4\n"[..]);
        let chunk = stream.next().await.expect("one chunk").expect("ok");
        assert_eq!(&chunk[..], b"%PDF-1.4\n");
        assert!(stream.next().await.is_none());
    }
}
