use std::fmt;
use std::time::Duration;
use url::Url;

/// Scheme, host and optional path prefix that short codes are appended to.
///
/// Trailing slashes are stripped once, here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err("BASE_URL must not be empty".to_string());
        }

        let parsed = Url::parse(trimmed).map_err(|e| format!("Invalid BASE_URL: {}", e))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
            return Err("BASE_URL must be an http(s) URL with a host".to_string());
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the public short URL for `code`
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.0, code)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// URL shortening configuration
#[derive(Debug, Clone)]
pub struct UrlConfig {
    /// Base URL for constructing short URLs (e.g., "https://sho.rt")
    pub base_url: BaseUrl,

    /// Maximum number of inserts tried for one generated short code request
    pub short_code_max_attempts: u32,

    /// Linear backoff step between collision retries, in milliseconds
    pub retry_backoff_ms: u64,
}

impl UrlConfig {
    /// Validate URL configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.short_code_max_attempts < 1 || self.short_code_max_attempts > 100 {
            return Err("SHORT_CODE_MAX_ATTEMPTS must be between 1 and 100".to_string());
        }

        if self.retry_backoff_ms > 1000 {
            return Err("SHORT_CODE_RETRY_BACKOFF_MS must be at most 1000".to_string());
        }

        Ok(())
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_strips_trailing_slashes() {
        let base = BaseUrl::parse("https://sho.rt//").unwrap();
        assert_eq!(base.as_str(), "https://sho.rt");
        assert_eq!(base.short_url("promo1"), "https://sho.rt/promo1");
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let base = BaseUrl::parse("http://localhost:3000/s/").unwrap();
        assert_eq!(base.short_url("abc"), "http://localhost:3000/s/abc");
    }

    #[test]
    fn test_base_url_rejects_garbage() {
        assert!(BaseUrl::parse("").is_err());
        assert!(BaseUrl::parse("/").is_err());
        assert!(BaseUrl::parse("sho.rt").is_err());
        assert!(BaseUrl::parse("mailto:someone@example.com").is_err());
    }
}
