// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search provider trait definition

use async_trait::async_trait;

use super::types::{SearchError, SourceHit};

/// Trait for implementing search providers
///
/// Providers query one web-search backend for candidate evidence URLs.
/// Multiple providers can be registered with automatic failover.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a web search
    ///
    /// # Arguments
    /// * `query` - The search query string (already carries the jurisdiction modifier)
    /// * `num_results` - Maximum number of results to return
    ///
    /// # Returns
    /// A vector of source hits or an error
    async fn search(&self, query: &str, num_results: usize)
        -> Result<Vec<SourceHit>, SearchError>;

    /// Get the provider name for logging
    fn name(&self) -> &'static str;

    /// Get provider priority (lower = preferred)
    ///
    /// Default priority is 100. Providers with lower priority are
    /// tried first during failover.
    fn priority(&self) -> u8 {
        100
    }
}
