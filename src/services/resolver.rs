use crate::error::{AppError, AppResult};
use crate::services::validation::is_valid_short_code;
use crate::store::UrlStore;
use std::sync::Arc;
use tracing::warn;

/// Read-only lookup of short codes.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn UrlStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn UrlStore>) -> Self {
        Self { store }
    }

    /// Return the original URL stored under `short_code`.
    ///
    /// Codes without the short code shape are never looked up.
    pub async fn resolve(&self, short_code: &str) -> AppResult<String> {
        if !is_valid_short_code(short_code) {
            return Err(AppError::UrlNotFound(short_code.to_string()));
        }

        match self.store.find_by_code(short_code).await {
            Ok(Some(mapping)) => Ok(mapping.original_url),
            Ok(None) => {
                warn!(operation = "resolve", code = %short_code, "Short code not found");
                Err(AppError::UrlNotFound(short_code.to_string()))
            }
            Err(e) => {
                tracing::error!(operation = "resolve", code = %short_code, error = ?e, "Lookup failed");
                Err(e)
            }
        }
    }
}
