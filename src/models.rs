use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored short code to URL mapping
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UrlMapping {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlMapping {
    pub short_code: String,
    pub original_url: String,
    pub is_custom: bool,
}

/// Request to create a short URL with a caller-chosen code
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomUrlRequest {
    #[serde(default)]
    pub original_url: String,

    #[serde(default)]
    pub custom_code: String,
}

/// Response after creating a short URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenedUrl {
    pub short_url: String,
    pub original_url: String,
    pub is_custom: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortened_url_uses_camel_case() {
        let response = ShortenedUrl {
            short_url: "https://sho.rt/promo1".to_string(),
            original_url: "https://example.com/page".to_string(),
            is_custom: true,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["shortUrl"], "https://sho.rt/promo1");
        assert_eq!(value["originalUrl"], "https://example.com/page");
        assert_eq!(value["isCustom"], true);
    }

    #[test]
    fn test_custom_request_missing_fields_default_to_empty() {
        let request: CreateCustomUrlRequest =
            serde_json::from_str(r#"{"originalUrl":"https://example.com"}"#).unwrap();
        assert_eq!(request.original_url, "https://example.com");
        assert!(request.custom_code.is_empty());
    }
}
