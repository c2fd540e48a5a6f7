//! DocVault Server: folders of documents kept on disk and indexed in SQLite.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use docvault_api::{AppState, build_app};
use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::traits::storage::BlobStore;
use docvault_database::DatabasePool;
use docvault_storage::LocalBlobStore;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DOCVAULT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocVault v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Storage root ─────────────────────────────────────
    tracing::info!(root = %config.storage.root_path, "Initializing blob store...");
    let blob_store: Arc<dyn BlobStore> =
        Arc::new(LocalBlobStore::new(&config.storage.root_path).await?);

    // ── Step 2: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;

    docvault_database::migration::run_migrations(db.pool()).await?;

    // ── Step 3: Repositories and services ────────────────────────
    let state = AppState::new(config.clone(), db.pool().clone(), blob_store);

    // ── Step 4: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, "DocVault server listening");

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    // In-flight requests get `grace` to finish once the signal arrives.
    tokio::select! {
        result = &mut server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        () = async {
            let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Connections still open after grace period");
        }
    }

    // ── Step 5: Shutdown ─────────────────────────────────────────
    db.close().await;
    tracing::info!("DocVault server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
