// src/loader/config.rs
// =============================================================================
// Tuning knobs for the loader.
//
// The defaults are the policy values that keep us under CoinCap's rate limit:
// - batch size 2 (at most two requests in flight)
// - 100 ms between batches
// - 200 ms after a 429 response
// - 500 ms between retry cycles
// - 10 retry cycles at most
//
// Tests build their own config with zero pauses so they never sleep.
// =============================================================================

use crate::error::TrackerError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.coincap.io/v2";

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// How many assets are fetched concurrently.
    pub batch_size: usize,
    /// Upper bound on retry cycles before giving up.
    pub max_cycles: u32,
    /// Pause between two batches of the same cycle.
    pub batch_pause: Duration,
    /// Pause between two retry cycles.
    pub cycle_pause: Duration,
    /// Pause after a 429 Too Many Requests answer.
    pub rate_limit_pause: Duration,
    /// Per-request timeout of the HTTP client.
    pub request_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            batch_size: 2,
            max_cycles: 10,
            batch_pause: Duration::from_millis(100),
            cycle_pause: Duration::from_millis(500),
            rate_limit_pause: Duration::from_millis(200),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl LoaderConfig {
    /// Config without any pauses, for tests.
    #[cfg(test)]
    pub fn immediate() -> Self {
        LoaderConfig {
            batch_pause: Duration::ZERO,
            cycle_pause: Duration::ZERO,
            rate_limit_pause: Duration::ZERO,
            ..LoaderConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.batch_size == 0 {
            return Err(TrackerError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.max_cycles == 0 {
            return Err(TrackerError::InvalidConfig(
                "max retry cycles must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(TrackerError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_rate_limit_policy() {
        let config = LoaderConfig::default();
        assert_eq!(config.batch_size, 2);
        assert_eq!(config.max_cycles, 10);
        assert!(config.cycle_pause > config.batch_pause);
        assert_ne!(config.rate_limit_pause, config.batch_pause);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_immediate_has_no_pauses() {
        let config = LoaderConfig::immediate();
        assert!(config.batch_pause.is_zero());
        assert!(config.cycle_pause.is_zero());
        assert!(config.rate_limit_pause.is_zero());
        assert_eq!(config.batch_size, 2);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let config = LoaderConfig {
            batch_size: 0,
            ..LoaderConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrackerError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_cycles_is_rejected() {
        let config = LoaderConfig {
            max_cycles: 0,
            ..LoaderConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
