use crate::config::BaseUrl;
use crate::error::{AppError, AppResult};
use crate::models::{NewUrlMapping, ShortenedUrl, UrlMapping};
use crate::services::short_code::CodeGenerator;
use crate::services::validation::{parse_absolute_url, validate_custom_code};
use crate::store::UrlStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Retry policy for generated codes that collide with stored ones.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total insert attempts, including the first
    pub max_attempts: u32,
    /// Delay before retry `n` is `backoff * n`
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_millis(5),
        }
    }
}

/// Creates new mappings. This is the only writer of the store.
#[derive(Clone)]
pub struct ShortenerService {
    store: Arc<dyn UrlStore>,
    generator: Arc<dyn CodeGenerator>,
    base_url: BaseUrl,
    retry: RetryPolicy,
}

impl ShortenerService {
    pub fn new(
        store: Arc<dyn UrlStore>,
        generator: Arc<dyn CodeGenerator>,
        base_url: BaseUrl,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            generator,
            base_url,
            retry,
        }
    }

    /// Shorten `original_url` under a generated code.
    ///
    /// A generated code that is already taken is replaced by a fresh one, up
    /// to `retry.max_attempts` inserts in total.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if `original_url` is not an absolute URL
    /// - [`AppError::ShortCodeGenerationFailed`] if every attempt collided
    /// - storage-class errors from the store
    pub async fn auto_shorten(&self, original_url: &str) -> AppResult<ShortenedUrl> {
        let original_url = parse_absolute_url(original_url).inspect_err(|_| {
            warn!(operation = "auto_shorten", url = %original_url, "Rejected malformed URL");
        })?;

        let attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=attempts {
            let short_code = self.generator.generate();
            let mapping = NewUrlMapping {
                short_code: short_code.clone(),
                original_url: original_url.clone(),
                is_custom: false,
            };

            match self.store.insert(mapping).await {
                Ok(stored) => {
                    info!(operation = "auto_shorten", code = %stored.short_code, "Created short URL");
                    return Ok(self.respond(stored));
                }
                Err(AppError::ShortCodeExists(_)) => {
                    warn!(
                        operation = "auto_shorten",
                        code = %short_code,
                        attempt,
                        max_attempts = attempts,
                        "Generated short code collided"
                    );
                    if attempt < attempts && !self.retry.backoff.is_zero() {
                        tokio::time::sleep(self.retry.backoff * attempt).await;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        operation = "auto_shorten",
                        code = %short_code,
                        url = %original_url,
                        error = ?e,
                        "Failed to store short URL"
                    );
                    return Err(e);
                }
            }
        }

        tracing::error!(
            operation = "auto_shorten",
            url = %original_url,
            attempts,
            "Gave up generating a unique short code"
        );
        Err(AppError::ShortCodeGenerationFailed(attempts))
    }

    /// Shorten `original_url` under the caller's `custom_code`.
    ///
    /// The existence check only gives an early answer; a uniqueness failure at
    /// insert time is reported the same way.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if `original_url` is not an absolute URL
    /// - [`AppError::InvalidShortCode`] if `custom_code` is not 3-20 alphanumerics
    /// - [`AppError::ShortCodeExists`] if the code is taken
    /// - storage-class errors from the store
    pub async fn custom_shorten(
        &self,
        original_url: &str,
        custom_code: &str,
    ) -> AppResult<ShortenedUrl> {
        let original_url = parse_absolute_url(original_url).inspect_err(|_| {
            warn!(operation = "custom_shorten", url = %original_url, "Rejected malformed URL");
        })?;
        validate_custom_code(custom_code).inspect_err(|_| {
            warn!(operation = "custom_shorten", code = %custom_code, "Rejected malformed custom code");
        })?;

        if self.store.code_exists(custom_code).await? {
            warn!(operation = "custom_shorten", code = %custom_code, "Custom code already in use");
            return Err(AppError::ShortCodeExists(custom_code.to_string()));
        }

        let mapping = NewUrlMapping {
            short_code: custom_code.to_string(),
            original_url,
            is_custom: true,
        };

        match self.store.insert(mapping).await {
            Ok(stored) => {
                info!(operation = "custom_shorten", code = %stored.short_code, "Created custom short URL");
                Ok(self.respond(stored))
            }
            Err(AppError::ShortCodeExists(code)) => {
                warn!(operation = "custom_shorten", code = %code, "Custom code claimed concurrently");
                Err(AppError::ShortCodeExists(code))
            }
            Err(e) => {
                tracing::error!(
                    operation = "custom_shorten",
                    code = %custom_code,
                    error = ?e,
                    "Failed to store custom short URL"
                );
                Err(e)
            }
        }
    }

    fn respond(&self, stored: UrlMapping) -> ShortenedUrl {
        ShortenedUrl {
            short_url: self.base_url.short_url(&stored.short_code),
            original_url: stored.original_url,
            is_custom: stored.is_custom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::services::short_code::RandomCodeGenerator;
    use crate::store::{MemoryStore, MockUrlStore};
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Hands out a fixed sequence of codes.
    struct ScriptedGenerator(Mutex<VecDeque<&'static str>>);

    impl ScriptedGenerator {
        fn new(codes: &[&'static str]) -> Self {
            Self(Mutex::new(codes.iter().copied().collect()))
        }
    }

    impl CodeGenerator for ScriptedGenerator {
        fn generate(&self) -> String {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .expect("script ran out of codes")
                .to_string()
        }
    }

    fn base_url() -> BaseUrl {
        BaseUrl::parse("https://sho.rt/").unwrap()
    }

    fn no_backoff(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff: Duration::ZERO,
        }
    }

    fn service_with(
        store: Arc<dyn UrlStore>,
        generator: Arc<dyn CodeGenerator>,
        max_attempts: u32,
    ) -> ShortenerService {
        ShortenerService::new(store, generator, base_url(), no_backoff(max_attempts))
    }

    fn stored(mapping: NewUrlMapping) -> UrlMapping {
        UrlMapping {
            id: 1,
            short_code: mapping.short_code,
            original_url: mapping.original_url,
            is_custom: mapping.is_custom,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_auto_shorten_builds_short_url() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone(), Arc::new(RandomCodeGenerator::new()), 5);

        let result = service.auto_shorten("https://example.com/a").await.unwrap();
        let code = result.short_url.strip_prefix("https://sho.rt/").unwrap();

        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(result.original_url, "https://example.com/a");
        assert!(!result.is_custom);
        assert!(store.code_exists(code).await.unwrap());
    }

    #[tokio::test]
    async fn test_auto_shorten_retries_on_collision() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(NewUrlMapping {
                short_code: "AAAAAAAA".to_string(),
                original_url: "https://taken.example".to_string(),
                is_custom: false,
            })
            .await
            .unwrap();

        let generator = Arc::new(ScriptedGenerator::new(&["AAAAAAAA", "AAAAAAAA", "BBBBBBBB"]));
        let service = service_with(store.clone(), generator, 5);

        let result = service.auto_shorten("https://example.com").await.unwrap();
        assert_eq!(result.short_url, "https://sho.rt/BBBBBBBB");

        let untouched = store.find_by_code("AAAAAAAA").await.unwrap().unwrap();
        assert_eq!(untouched.original_url, "https://taken.example");
    }

    #[tokio::test]
    async fn test_auto_shorten_gives_up_after_max_attempts() {
        let mut store = MockUrlStore::new();
        store
            .expect_insert()
            .times(3)
            .returning(|m| Err(AppError::ShortCodeExists(m.short_code)));

        let generator = Arc::new(ScriptedGenerator::new(&["AAAAAAAA", "BBBBBBBB", "CCCCCCCC"]));
        let service = service_with(Arc::new(store), generator, 3);

        let err = service.auto_shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::ShortCodeGenerationFailed(3)));
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[tokio::test]
    async fn test_auto_shorten_surfaces_storage_errors_without_retry() {
        let mut store = MockUrlStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::Storage("connection reset".to_string())));

        let service = service_with(
            Arc::new(store),
            Arc::new(RandomCodeGenerator::with_seed(3)),
            5,
        );

        let err = service.auto_shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_auto_shorten_rejects_malformed_url_before_storage() {
        let mut store = MockUrlStore::new();
        store.expect_insert().never();

        let service = service_with(
            Arc::new(store),
            Arc::new(RandomCodeGenerator::with_seed(3)),
            5,
        );

        let err = service.auto_shorten("not a url").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_custom_shorten_then_conflict() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store, Arc::new(RandomCodeGenerator::new()), 5);

        let created = service
            .custom_shorten("https://example.com/page", "promo1")
            .await
            .unwrap();
        assert_eq!(created.short_url, "https://sho.rt/promo1");
        assert_eq!(created.original_url, "https://example.com/page");
        assert!(created.is_custom);

        let err = service
            .custom_shorten("https://other.com", "promo1")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_custom_shorten_late_uniqueness_failure_is_conflict() {
        let mut store = MockUrlStore::new();
        store.expect_code_exists().returning(|_| Ok(false));
        store
            .expect_insert()
            .times(1)
            .returning(|m| Err(AppError::ShortCodeExists(m.short_code)));

        let service = service_with(
            Arc::new(store),
            Arc::new(RandomCodeGenerator::with_seed(3)),
            5,
        );

        let err = service
            .custom_shorten("https://example.com", "raced1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ShortCodeExists(code) if code == "raced1"));
    }

    #[tokio::test]
    async fn test_custom_shorten_rejects_bad_codes_for_any_url() {
        let mut store = MockUrlStore::new();
        store.expect_code_exists().never();
        store.expect_insert().never();

        let service = service_with(
            Arc::new(store),
            Arc::new(RandomCodeGenerator::with_seed(3)),
            5,
        );

        let too_long = "a".repeat(21);
        for code in ["ab", "has space", "!!!", too_long.as_str(), ""] {
            for url in ["https://example.com", "not a url"] {
                let err = service.custom_shorten(url, code).await.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::InvalidInput, "{:?} / {:?}", url, code);
            }
        }
    }

    #[tokio::test]
    async fn test_custom_shorten_stores_custom_flag() {
        let mut store = MockUrlStore::new();
        store.expect_code_exists().returning(|_| Ok(false));
        store
            .expect_insert()
            .withf(|m| m.is_custom && m.short_code == "Launch2025")
            .returning(|m| Ok(stored(m)));

        let service = service_with(
            Arc::new(store),
            Arc::new(RandomCodeGenerator::with_seed(3)),
            5,
        );

        let result = service
            .custom_shorten(" https://example.com/launch ", "Launch2025")
            .await
            .unwrap();
        assert_eq!(result.original_url, "https://example.com/launch");
        assert_eq!(result.short_url, "https://sho.rt/Launch2025");
    }
}
