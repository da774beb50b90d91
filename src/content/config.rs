//! Configuration for content fetching

use std::env;

/// Configuration for content fetching
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout per page fetch in seconds (default: 15)
    pub timeout_secs: u64,
    /// Size of the parallel fetch pool; `None` sizes it to the host's
    /// available processing units
    pub concurrency: Option<usize>,
}

impl FetchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            timeout_secs: env::var("PHARMASCREEN_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            concurrency: env::var("PHARMASCREEN_FETCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if self.concurrency == Some(0) {
            return Err("concurrency must be at least 1 when set".to_string());
        }
        Ok(())
    }

    /// Resolve the worker-pool size, defaulting to the host's parallelism
    pub fn pool_size(&self) -> usize {
        self.concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            concurrency: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, 15);
        assert!(config.concurrency.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pool_size_defaults_to_host_parallelism() {
        let config = FetchConfig::default();
        assert!(config.pool_size() >= 1);
    }

    #[test]
    fn test_pool_size_honors_explicit_concurrency() {
        let config = FetchConfig {
            concurrency: Some(2),
            ..Default::default()
        };
        assert_eq!(config.pool_size(), 2);
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = FetchConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_concurrency() {
        let config = FetchConfig {
            concurrency: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
