// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for evidence-source discovery

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single candidate source returned by a search provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceHit {
    /// Title of the result, when the provider surfaces one
    pub title: String,
    /// URL of the result
    pub url: String,
    /// Snippet/description of the result
    pub snippet: String,
    /// Provider that produced the hit (e.g., "bing", "duckduckgo")
    pub provider: String,
}

/// Errors that can occur while querying a search provider
///
/// All of these are absorbed by `SourceDiscovery`; they never abort a
/// classification request.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Non-success response or transport failure from the search endpoint
    #[error("Search backend error: {status} - {message}")]
    Backend {
        /// HTTP status code, 0 when the request never completed
        status: u16,
        /// Error message
        message: String,
    },

    /// Search request timed out
    #[error("Search timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },
}
