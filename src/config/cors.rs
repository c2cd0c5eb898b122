use http::HeaderValue;

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// List of allowed origins for CORS (use ["*"] for all origins)
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Origins as header values, failing on the first one that cannot be sent
    pub fn origin_values(&self) -> Result<Vec<HeaderValue>, String> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| format!("Invalid origin in ALLOWED_ORIGINS: {:?}", origin))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.allows_any() {
            return Ok(());
        }
        self.origin_values().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origins(list: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: list.iter().map(|o| o.to_string()).collect(),
        }
    }

    #[test]
    fn test_wildcard_is_valid() {
        assert!(origins(&["*"]).validate().is_ok());
    }

    #[test]
    fn test_origin_values() {
        let values = origins(&["http://localhost:5173", "https://example.com"])
            .origin_values()
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1], "https://example.com");
    }

    #[test]
    fn test_unsendable_origin_is_rejected() {
        let err = origins(&["https://ok.example", "bad\norigin"])
            .validate()
            .unwrap_err();
        assert!(err.contains("ALLOWED_ORIGINS"));
    }
}
