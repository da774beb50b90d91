//! Best-effort page fetching with a bounded parallel pool
//!
//! Each candidate URL gets exactly one GET with a rotated browser identity
//! and a fixed timeout. Failures of any kind (transport, TLS, decoding,
//! blocked URL) produce empty text rather than errors; the evidence
//! aggregator's length filter absorbs them downstream.

use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::config::FetchConfig;
use super::extractor::extract_text;
use crate::identity::UserAgentProvider;

/// Text fetched for one candidate URL, positionally matched to discovery order
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub url: String,
    pub text: String,
}

/// Fetches candidate pages and extracts their text
pub struct ContentFetcher {
    client: Client,
    identities: Arc<dyn UserAgentProvider>,
    config: FetchConfig,
}

impl ContentFetcher {
    /// Create a new content fetcher
    pub fn new(config: FetchConfig, identities: Arc<dyn UserAgentProvider>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            identities,
            config,
        }
    }

    /// Fetch one URL and extract its text
    ///
    /// Returns an empty string on any failure. No retry, no backoff.
    pub async fn fetch(&self, url: &str) -> String {
        if !Self::is_safe_url(url) {
            debug!("Skipping unsafe or unparsable URL: {}", url);
            return String::new();
        }

        let response = match self
            .client
            .get(url)
            .header("User-Agent", self.identities.next_user_agent())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                return String::new();
            }
        };

        if !response.status().is_success() {
            debug!("HTTP {} for {}", response.status().as_u16(), url);
            return String::new();
        }

        let html = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Body read failed for {}: {}", url, e);
                return String::new();
            }
        };

        let text = extract_text(&html);
        debug!("Extracted {} chars from {}", text.chars().count(), url);
        text
    }

    /// Fetch every candidate URL through a bounded worker pool
    ///
    /// The pool is sized to the host's processing units (or the configured
    /// override) and this call blocks until every fetch has finished or
    /// failed. Outcomes are returned in input order, each carrying its
    /// originating URL.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<FetchOutcome> {
        if urls.is_empty() {
            return Vec::new();
        }

        let pool_size = self.config.pool_size();
        debug!("Fetching {} URLs with {} workers", urls.len(), pool_size);

        stream::iter(urls.iter().cloned())
            .map(|url| async move {
                let text = self.fetch(&url).await;
                FetchOutcome { url, text }
            })
            .buffered(pool_size)
            .collect()
            .await
    }

    /// Check that a URL is fetchable and does not target internal hosts
    pub fn is_safe_url(url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if !["http", "https"].contains(&parsed.scheme()) {
            return false;
        }

        let host = match parsed.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        if host == "localhost" || host == "0.0.0.0" {
            return false;
        }
        if host.starts_with("127.") || host.starts_with("10.") {
            return false;
        }
        if host.starts_with("192.168.") || host.starts_with("169.254.") {
            return false;
        }
        // 172.16.0.0/12
        if let Some(rest) = host.strip_prefix("172.") {
            if let Some(second) = rest.split('.').next() {
                if let Ok(octet) = second.parse::<u8>() {
                    if (16..=31).contains(&octet) {
                        return false;
                    }
                }
            }
        }

        true
    }
}
