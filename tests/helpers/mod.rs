//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use docvault_api::{AppState, build_app};
use docvault_core::config::{AppConfig, DatabaseConfig, StorageConfig};
use docvault_core::traits::storage::BlobStore;
use docvault_database::DatabasePool;
use docvault_database::migration::run_migrations;
use docvault_storage::LocalBlobStore;

const BOUNDARY: &str = "docvault-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: SqlitePool,
    /// Application config
    pub config: AppConfig,
    /// Owns the database file and storage root
    pub dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub bytes: Bytes,
    /// Parsed JSON body (`Null` when the body is not JSON)
    pub body: Value,
}

impl TestResponse {
    /// Body as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Value of a header as a string.
    pub fn header(&self, name: header::HeaderName) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }
}

impl TestApp {
    /// Create a new test application on a fresh database and storage root
    pub async fn new() -> Self {
        Self::with_upload_limit(StorageConfig::default().max_upload_size_bytes).await
    }

    /// Create a test application with a custom upload size limit
    pub async fn with_upload_limit(max_upload_size_bytes: u64) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let config = AppConfig {
            database: DatabaseConfig {
                url: format!("sqlite://{}", dir.path().join("docvault.db").display()),
                ..DatabaseConfig::default()
            },
            storage: StorageConfig {
                root_path: dir.path().join("storage").display().to_string(),
                max_upload_size_bytes,
            },
            ..AppConfig::default()
        };

        let db_pool = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database")
            .into_pool();
        run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let blob_store: Arc<dyn BlobStore> = Arc::new(
            LocalBlobStore::new(&config.storage.root_path)
                .await
                .expect("Failed to init storage"),
        );

        let state = AppState::new(config.clone(), db_pool.clone(), blob_store);
        let router = build_app(state);

        Self {
            router,
            db_pool,
            config,
            dir,
        }
    }

    /// Storage root on disk
    pub fn storage_root(&self) -> PathBuf {
        PathBuf::from(&self.config.storage.root_path)
    }

    /// Send a request with an optional JSON body
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Submit an HTML form
    pub async fn form(&self, path: &str, body: &str) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a file as the multipart field `file`
    pub async fn upload(&self, path: &str, file_name: &str, content: &[u8]) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Create a folder through the API and return its JSON
    pub async fn create_folder(&self, name: &str) -> Value {
        let response = self
            .request("POST", "/api/folders", Some(serde_json::json!({ "name": name })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"].clone()
    }

    /// Upload into a folder through the API and return the document JSON
    pub async fn upload_document(&self, folder_id: &str, file_name: &str, content: &[u8]) -> Value {
        let response = self
            .upload(&format!("/api/folders/{folder_id}/documents"), file_name, content)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["document"].clone()
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}
