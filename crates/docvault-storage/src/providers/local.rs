//! Local filesystem blob store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::storage::{BlobStore, ByteStream};

/// Local filesystem blob store.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let clean = Path::new(path.trim_start_matches('/'));
        if clean
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(AppError::validation(format!(
                "Path escapes the storage root: {path}"
            )));
        }
        Ok(self.root.join(clean))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Copy the stream into `target`, syncing before returning.
    async fn spool(&self, target: &Path, path: &str, mut stream: ByteStream) -> AppResult<u64> {
        let mut file = fs::File::create(target).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create file: {path}"),
                e,
            )
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush file", e))?;
        file.sync_all()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to sync file", e))?;

        Ok(total_bytes)
    }
}

/// Temporary sibling used while a write is in flight.
fn partial_path(full_path: &Path) -> PathBuf {
    let name = full_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    full_path.with_file_name(format!(".{name}.{}.part", Uuid::new_v4().simple()))
}

fn not_found_or_storage(e: std::io::Error, path: &str, action: &str) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("File not found: {path}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Failed to {action}: {path}"), e)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn ensure_dir(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        fs::create_dir_all(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {path}"),
                e,
            )
        })?;
        debug!(path, "Ensured directory");
        Ok(())
    }

    async fn write_stream(&self, path: &str, stream: ByteStream) -> AppResult<u64> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        let temp_path = partial_path(&full_path);
        let total_bytes = match self.spool(&temp_path, path, stream).await {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e);
            }
        };

        // A hard link publishes the synced file under its final name and
        // fails instead of replacing a file that is already there.
        let published = fs::hard_link(&temp_path, &full_path).await;
        if let Err(e) = fs::remove_file(&temp_path).await {
            debug!(path, error = %e, "Failed to remove temporary file");
        }
        match published {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(AppError::conflict(format!("File already exists: {path}")));
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to move file into place: {path}"),
                    e,
                ));
            }
        }

        debug!(path, bytes = total_bytes, "Wrote file from stream");
        Ok(total_bytes)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(path)?;
        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| not_found_or_storage(e, path, "open file"))?;

        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path, "Removed file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    async fn remove_tree(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        if full_path == self.root {
            return Err(AppError::validation("Refusing to delete the storage root"));
        }
        match fs::remove_dir_all(&full_path).await {
            Ok(()) => {
                debug!(path, "Removed directory tree");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete directory: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to stat path: {path}"),
                e,
            )
        })
    }

    async fn size(&self, path: &str) -> AppResult<u64> {
        let full_path = self.resolve(path)?;
        let meta = fs::metadata(&full_path)
            .await
            .map_err(|e| not_found_or_storage(e, path, "get metadata"))?;
        Ok(meta.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use docvault_core::traits::storage::bytes_stream;

    async fn store() -> (tempfile::TempDir, LocalBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();
        (dir, store)
    }

    async fn read_all(store: &LocalBlobStore, path: &str) -> Vec<u8> {
        let mut stream = store.read(path).await.unwrap();
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_write_read_remove() {
        let (_dir, store) = store().await;

        let written = store
            .write_stream("docs/hello.txt", bytes_stream("hello world"))
            .await
            .unwrap();
        assert_eq!(written, 11);
        assert!(store.exists("docs/hello.txt").await.unwrap());
        assert_eq!(store.size("docs/hello.txt").await.unwrap(), 11);
        assert_eq!(read_all(&store, "docs/hello.txt").await, b"hello world");

        store.remove("docs/hello.txt").await.unwrap();
        assert!(!store.exists("docs/hello.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_write_never_replaces_existing_file() {
        let (dir, store) = store().await;

        store
            .write_stream("docs/a.txt", bytes_stream("first version"))
            .await
            .unwrap();
        let err = store
            .write_stream("docs/a.txt", bytes_stream("second"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(read_all(&store, "docs/a.txt").await, b"first version");

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("docs"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("a.txt")]);
    }

    #[tokio::test]
    async fn test_concurrent_writes_to_one_path() {
        let (_dir, store) = store().await;

        let (a, b) = tokio::join!(
            store.write_stream("docs/same.txt", bytes_stream("from a")),
            store.write_stream("docs/same.txt", bytes_stream("from b")),
        );

        let (winner, loser) = match (a, b) {
            (Ok(_), Err(e)) => ("from a", e),
            (Err(e), Ok(_)) => ("from b", e),
            other => panic!("expected exactly one write to succeed: {other:?}"),
        };
        assert_eq!(loser.kind, ErrorKind::Conflict);
        assert_eq!(read_all(&store, "docs/same.txt").await, winner.as_bytes());
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_nothing_behind() {
        let (dir, store) = store().await;
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("client went away")),
        ];

        let err = store
            .write_stream("docs/broken.bin", Box::pin(futures::stream::iter(chunks)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
        assert!(!store.exists("docs/broken.bin").await.unwrap());
        assert_eq!(std::fs::read_dir(dir.path().join("docs")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_targets() {
        let (_dir, store) = store().await;

        store.remove("nope/missing.txt").await.unwrap();
        store.remove_tree("nope").await.unwrap();
        assert_eq!(
            store.size("nope/missing.txt").await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert!(store.read("nope/missing.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_ensure_dir_and_remove_tree() {
        let (dir, store) = store().await;

        store.ensure_dir("invoices").await.unwrap();
        store.ensure_dir("invoices").await.unwrap();
        store
            .write_stream("invoices/q1.pdf", bytes_stream("%PDF-1.4\n"))
            .await
            .unwrap();

        store.remove_tree("invoices").await.unwrap();
        assert!(!dir.path().join("invoices").exists());
        assert!(store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_paths_cannot_escape_root() {
        let (_dir, store) = store().await;

        let err = store.ensure_dir("../outside").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(store.remove_tree("").await.is_err());
    }
}
