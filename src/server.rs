//! Server startup and shutdown.
//!
//! This module contains the `run_server` function which handles:
//! - Store initialization (PostgreSQL or in-memory)
//! - Migration running
//! - Application state and router creation
//! - Server binding and graceful shutdown

use crate::config::{Config, StoreBackend};
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::routes;
use crate::services::RandomCodeGenerator;
use crate::state::AppState;
use crate::store::{MemoryStore, UrlStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Run the web server with the given configuration.
///
/// # Errors
///
/// This function will return an error if:
/// - Database connection fails
/// - Migration fails
/// - Server binding fails
/// - Server runtime error occurs
pub async fn run_server(config: Config, should_migrate: bool) -> AppResult<()> {
    info!("Starting rustshort server...");

    let store = build_store(&config, should_migrate).await?;

    // One generator, seeded once, shared by every request
    let generator = Arc::new(RandomCodeGenerator::new());
    let state = Arc::new(AppState::new(store, generator, &config.url));

    let app = routes::create_router(state, &config.server, &config.cors, &config.rate_limit)?;

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);
    info!("Base URL: {}", config.url.base_url);

    // Peer addresses back the rate limiter when no proxy headers are present
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the configured store, migrating PostgreSQL first if requested.
pub async fn build_store(config: &Config, should_migrate: bool) -> AppResult<Arc<dyn UrlStore>> {
    match config.database.backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory store; mappings are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let repository = connect_repository(config).await?;

            if should_migrate {
                info!("Running database migrations...");
                repository.run_migrations().await?;
                info!("Migrations completed successfully");
            }

            Ok(Arc::new(repository))
        }
    }
}

/// Open the PostgreSQL connection pool.
pub async fn connect_repository(config: &Config) -> AppResult<Repository> {
    let database_url = config
        .database
        .url
        .as_deref()
        .ok_or_else(|| AppError::MissingEnvVar("DATABASE_URL".to_string()))?;

    info!("Connecting to database...");
    Repository::new(
        database_url,
        config.database.max_connections,
        config.database.min_connections,
        config.database.acquire_timeout_seconds,
    )
    .await
}

/// Resolves when Ctrl+C (or SIGTERM on Unix) is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("Shutdown signal received");
}
