// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the LLM client

use std::env;

/// Configuration for the chat completions client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base endpoint of the OpenAI-compatible service
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var("PHARMASCREEN_LLM_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            model: env::var("PHARMASCREEN_LLM_MODEL")
                .unwrap_or_else(|_| "claude-3-5-sonnet".to_string()),
            timeout_secs: env::var("PHARMASCREEN_LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            model: "claude-3-5-sonnet".to_string(),
            timeout_secs: 120,
        }
    }
}
