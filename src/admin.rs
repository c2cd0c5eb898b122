//! Administrative command handlers.

use crate::config::{Config, StoreBackend};
use crate::error::{AppError, AppResult};
use crate::server::{build_store, connect_repository};
use crate::services::Resolver;
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Run database migrations
    Migrate,

    /// Print the original URL stored under a short code
    Resolve {
        /// Short code to look up
        code: String,
    },
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    match admin_command {
        AdminCommands::Migrate => migrate(config).await,
        AdminCommands::Resolve { code } => resolve(config, &code).await,
    }
}

/// Run database migrations.
async fn migrate(config: Config) -> AppResult<()> {
    info!("Running database migrations...");

    let repository = connect_repository(&config).await?;
    repository.run_migrations().await?;

    info!("Migrations completed successfully");
    Ok(())
}

/// Look up a short code without going through HTTP.
async fn resolve(config: Config, code: &str) -> AppResult<()> {
    ensure_persistent(&config)?;

    let store = build_store(&config, false).await?;
    let original_url = Resolver::new(store).resolve(code).await?;

    println!("{}", original_url);
    Ok(())
}

/// A fresh in-memory store holds nothing, so lookups need PostgreSQL.
fn ensure_persistent(config: &Config) -> AppResult<()> {
    match config.database.backend {
        StoreBackend::Postgres => Ok(()),
        StoreBackend::Memory => Err(AppError::Configuration(
            "admin resolve needs STORE_BACKEND=postgres; the in-memory store starts empty"
                .to_string(),
        )),
    }
}
