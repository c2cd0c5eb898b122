mod cors;
mod database;
mod logging;
mod rate_limit;
mod server;
mod url;

pub use self::cors::CorsConfig;
pub use self::database::{DatabaseConfig, StoreBackend};
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::rate_limit::RateLimitConfig;
pub use self::server::ServerConfig;
pub use self::url::{BaseUrl, UrlConfig};

use crate::error::{AppError, AppResult};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub url: UrlConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::from_env_with_overrides(&[])
    }

    /// Load configuration from the environment, with `overrides` taking
    /// precedence over variables of the same name.
    pub fn from_env_with_overrides(overrides: &[(&str, String)]) -> AppResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| {
            overrides
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone())
                .or_else(|| env::var(key).ok())
        })
    }

    /// Build and validate configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_host = var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let server_port = parse_or(&var, "SERVER_PORT", 3000u16)?;
        let max_body_bytes = parse_or(&var, "MAX_BODY_BYTES", 16 * 1024usize)?;

        let backend = parse_or(&var, "STORE_BACKEND", StoreBackend::Postgres)?;
        let database_url = var("DATABASE_URL");
        let db_max_connections = parse_or(&var, "DB_MAX_CONNECTIONS", 10u32)?;
        let db_min_connections = parse_or(&var, "DB_MIN_CONNECTIONS", 1u32)?;
        let db_acquire_timeout = parse_or(&var, "DB_ACQUIRE_TIMEOUT_SECONDS", 30u64)?;

        // Short URLs are meaningless without a base, so there is no default.
        let base_url = var("BASE_URL").ok_or_else(|| AppError::MissingEnvVar("BASE_URL".to_string()))?;
        let base_url = BaseUrl::parse(&base_url).map_err(AppError::Configuration)?;
        let short_code_max_attempts = parse_or(&var, "SHORT_CODE_MAX_ATTEMPTS", 5u32)?;
        let retry_backoff_ms = parse_or(&var, "SHORT_CODE_RETRY_BACKOFF_MS", 5u64)?;

        let rate_limit_enabled = parse_or(&var, "RATE_LIMIT_ENABLED", true)?;
        let requests_per_minute = parse_or(&var, "RATE_LIMIT_PER_MINUTE", 60u64)?;
        let burst_size = parse_or(&var, "RATE_LIMIT_BURST", 10u32)?;

        let allowed_origins_str = var("ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string());
        let allowed_origins: Vec<String> = if allowed_origins_str.trim() == "*" {
            vec!["*".to_string()]
        } else {
            allowed_origins_str
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };

        let log_format = parse_or(&var, "LOG_FORMAT", LogFormat::Text)?;

        let config = Config {
            server: ServerConfig {
                host: server_host,
                port: server_port,
                max_body_bytes,
            },
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
                acquire_timeout_seconds: db_acquire_timeout,
            },
            url: UrlConfig {
                base_url,
                short_code_max_attempts,
                retry_backoff_ms,
            },
            rate_limit: RateLimitConfig {
                enabled: rate_limit_enabled,
                requests_per_minute,
                burst_size,
            },
            cors: CorsConfig { allowed_origins },
            logging: LoggingConfig { format: log_format },
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.server
            .validate()
            .and_then(|_| self.database.validate())
            .and_then(|_| self.url.validate())
            .and_then(|_| self.rate_limit.validate())
            .and_then(|_| self.cors.validate())
            .map_err(AppError::Configuration)
    }
}

/// Parse `key` if set, otherwise fall back to `default`
fn parse_or<T, V>(var: &V, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", key))),
        None => Ok(default),
    }
}
