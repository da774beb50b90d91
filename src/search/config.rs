// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for source discovery

use std::env;

/// Configuration for source discovery
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of candidate URLs discovery aims for per query
    pub desired_results: usize,
    /// Rate limit (requests per minute) across all providers
    pub rate_limit_per_minute: u32,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            desired_results: env::var("PHARMASCREEN_SEARCH_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            rate_limit_per_minute: env::var("PHARMASCREEN_SEARCH_RATE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.desired_results == 0 {
            return Err("desired_results must be at least 1".to_string());
        }
        if self.rate_limit_per_minute == 0 {
            return Err("rate_limit_per_minute must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            desired_results: 10,
            rate_limit_per_minute: 60,
        }
    }
}
