use std::time::Duration;

const MAX_REQUESTS_PER_MINUTE: u64 = 60_000;

/// Largest burst the lenient quota can double without overflowing
const MAX_BURST_SIZE: u32 = u32::MAX / 2;

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether per-client rate limiting is applied at all
    pub enabled: bool,

    /// Maximum number of requests per minute
    pub requests_per_minute: u64,

    /// Maximum burst size for rate limiting
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// Validate rate limiting configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.requests_per_minute == 0 || self.requests_per_minute > MAX_REQUESTS_PER_MINUTE {
            return Err(format!(
                "RATE_LIMIT_PER_MINUTE must be between 1 and {}",
                MAX_REQUESTS_PER_MINUTE
            ));
        }

        if self.burst_size == 0 || self.burst_size > MAX_BURST_SIZE {
            return Err(format!(
                "RATE_LIMIT_BURST must be between 1 and {}",
                MAX_BURST_SIZE
            ));
        }

        Ok(())
    }

    /// Replenish interval for the strict (create) quota
    pub fn strict_period(&self) -> Duration {
        Duration::from_nanos(60_000_000_000 / self.requests_per_minute)
    }

    /// Replenish interval for the lenient (redirect) quota, twice the budget
    pub fn lenient_period(&self) -> Duration {
        Duration::from_nanos(60_000_000_000 / (self.requests_per_minute * 2))
    }

    /// Burst for the lenient quota
    pub fn lenient_burst_size(&self) -> u32 {
        self.burst_size.saturating_mul(2)
    }
}
