use std::str::FromStr;

/// Which [`crate::store::UrlStore`] implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("Unknown STORE_BACKEND: {}", other)),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Store implementation to use
    pub backend: StoreBackend,

    /// PostgreSQL connection URL, required for the postgres backend
    pub url: Option<String>,

    /// Maximum number of database connections in the pool
    pub max_connections: u32,

    /// Minimum number of database connections to maintain
    pub min_connections: u32,

    /// Timeout in seconds for acquiring a connection from the pool
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Validate database configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == StoreBackend::Postgres && self.url.is_none() {
            return Err("DATABASE_URL is required when STORE_BACKEND is postgres".to_string());
        }

        if self.min_connections > self.max_connections {
            return Err("DB_MIN_CONNECTIONS cannot be greater than DB_MAX_CONNECTIONS".to_string());
        }

        if self.acquire_timeout_seconds == 0 {
            return Err("DB_ACQUIRE_TIMEOUT_SECONDS must be greater than 0".to_string());
        }

        Ok(())
    }
}
