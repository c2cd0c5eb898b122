use clap::{ArgAction, Parser, Subcommand};
use rustshort::admin::{self, AdminCommands};
use rustshort::config::{Config, LogFormat};
use rustshort::error::AppResult;
use rustshort::server;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// rustshort - a small URL shortener
#[derive(Parser, Debug)]
#[command(name = "rustshort")]
#[command(version)]
#[command(about = "A small URL shortener with custom short codes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Server {
        /// Host to bind to (overrides SERVER_HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT env var)
        #[arg(long)]
        port: Option<u16>,

        /// Run migrations on startup
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        migrate: bool,

        /// Keep mappings in memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        admin_command: AdminCommands,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let mut overrides = Vec::new();
    if let Commands::Server {
        host,
        port,
        in_memory,
        ..
    } = &cli.command
    {
        if let Some(host) = host {
            overrides.push(("SERVER_HOST", host.clone()));
        }
        if let Some(port) = port {
            overrides.push(("SERVER_PORT", port.to_string()));
        }
        if *in_memory {
            overrides.push(("STORE_BACKEND", "memory".to_string()));
        }
    }

    // Load configuration; a bad config is fatal before anything is served
    let config = match Config::from_env_with_overrides(&overrides) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    init_tracing(config.logging.format);

    match cli.command {
        Commands::Server { migrate, .. } => server::run_server(config, migrate).await,
        Commands::Admin { admin_command } => admin::run(config, admin_command).await,
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}
