//! Syntactic checks for caller input. Nothing here consults the store.

use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

pub const MIN_CODE_LENGTH: usize = 3;
pub const MAX_CODE_LENGTH: usize = 20;

static SHORT_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{3,20}$").expect("short code pattern is valid")
});

/// True iff `code` is 3-20 ASCII letters or digits.
pub fn is_valid_short_code(code: &str) -> bool {
    SHORT_CODE_REGEX.is_match(code)
}

/// Reject custom codes that do not have the short code shape.
pub fn validate_custom_code(code: &str) -> AppResult<()> {
    if is_valid_short_code(code) {
        Ok(())
    } else {
        Err(AppError::InvalidShortCode(format!(
            "Custom code must be {}-{} alphanumeric characters",
            MIN_CODE_LENGTH, MAX_CODE_LENGTH
        )))
    }
}

/// Accept `raw` iff it is a well-formed absolute URL.
///
/// Returns the trimmed input, which is what gets stored and echoed back.
/// Reachability is never checked.
pub fn parse_absolute_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl("Invalid URL format".to_string()));
    }

    Url::parse(trimmed).map_err(|_| AppError::InvalidUrl("Invalid URL format".to_string()))?;

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_short_codes() {
        assert!(is_valid_short_code("abc"));
        assert!(is_valid_short_code("promo1"));
        assert!(is_valid_short_code("ABCD"));
        assert!(is_valid_short_code("a1b2c3d4e5f6g7h8i9j0"));
    }

    #[test]
    fn test_invalid_short_codes() {
        assert!(!is_valid_short_code(""));
        assert!(!is_valid_short_code("ab"));
        assert!(!is_valid_short_code("has space"));
        assert!(!is_valid_short_code("!!!"));
        assert!(!is_valid_short_code("abc-123"));
        assert!(!is_valid_short_code("abc_123"));
        assert!(!is_valid_short_code("abc123\n"));
        assert!(!is_valid_short_code("ñandu1"));
        assert!(!is_valid_short_code(&"a".repeat(21)));
    }

    #[test]
    fn test_validate_custom_code_message() {
        let err = validate_custom_code("ab").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid short code: Custom code must be 3-20 alphanumeric characters"
        );
    }

    #[test]
    fn test_absolute_urls_accepted() {
        assert_eq!(
            parse_absolute_url("https://example.com/page").unwrap(),
            "https://example.com/page"
        );
        assert_eq!(
            parse_absolute_url("  http://localhost:3000/a?b=c  ").unwrap(),
            "http://localhost:3000/a?b=c"
        );
        assert!(parse_absolute_url("ftp://files.example.com/x").is_ok());
    }

    #[test]
    fn test_relative_or_malformed_urls_rejected() {
        for raw in ["", "   ", "not a url", "example.com", "/relative/path", "http://"] {
            let err = parse_absolute_url(raw).unwrap_err();
            assert!(matches!(err, AppError::InvalidUrl(_)), "accepted {:?}", raw);
        }
    }
}
