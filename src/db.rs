use crate::error::{AppError, AppResult};
use crate::models::{NewUrlMapping, UrlMapping};
use crate::store::UrlStore;
use async_trait::async_trait;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::str::FromStr;
use std::time::Duration;

/// PostgreSQL-backed URL store
#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    /// Create a new repository with a connection pool
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_seconds: u64,
    ) -> AppResult<Self> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Configuration(format!("Invalid database URL: {}", e)))?
            .disable_statement_logging();

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_seconds))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UrlStore for Repository {
    async fn insert(&self, mapping: NewUrlMapping) -> AppResult<UrlMapping> {
        let result = sqlx::query_as::<_, UrlMapping>(
            r#"
            INSERT INTO urls (short_code, original_url, is_custom)
            VALUES ($1, $2, $3)
            RETURNING id, short_code, original_url, is_custom, created_at
            "#,
        )
        .bind(&mapping.short_code)
        .bind(&mapping.original_url)
        .bind(mapping.is_custom)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(e) if is_unique_violation(&e) => Err(AppError::ShortCodeExists(mapping.short_code)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_code(&self, short_code: &str) -> AppResult<Option<UrlMapping>> {
        let result = sqlx::query_as::<_, UrlMapping>(
            r#"
            SELECT id, short_code, original_url, is_custom, created_at
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn code_exists(&self, short_code: &str) -> AppResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = $1)
            "#,
        )
        .bind(short_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// True when the error is a violation of the short code unique constraint
fn is_unique_violation(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation()
        && matches!(db_err.constraint(), Some("urls_short_code_key") | None)
}
