use crate::config::UrlConfig;
use crate::services::{CodeGenerator, Resolver, RetryPolicy, ShortenerService};
use crate::store::UrlStore;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This struct is wrapped in `Arc` and shared across all request handlers
/// via Axum's State extraction. The store is the only shared mutable
/// resource behind it.
#[derive(Clone)]
pub struct AppState {
    /// Creates new short URLs
    pub shortener: ShortenerService,

    /// Looks up short codes for redirects
    pub resolver: Resolver,

    /// Underlying store, used directly only for health checks
    pub store: Arc<dyn UrlStore>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UrlStore>,
        generator: Arc<dyn CodeGenerator>,
        url_config: &UrlConfig,
    ) -> Self {
        let retry = RetryPolicy {
            max_attempts: url_config.short_code_max_attempts,
            backoff: url_config.retry_backoff(),
        };

        Self {
            shortener: ShortenerService::new(
                store.clone(),
                generator,
                url_config.base_url.clone(),
                retry,
            ),
            resolver: Resolver::new(store.clone()),
            store,
        }
    }
}
