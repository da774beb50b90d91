// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bing web search provider
//!
//! Primary provider. Queries the public Bing HTML interface with a rotated
//! browser identity; no API key required.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::provider::SearchProvider;
use super::types::{SearchError, SourceHit};
use crate::identity::UserAgentProvider;

const BING_SEARCH_URL: &str = "https://www.bing.com/search";
const BING_TIMEOUT_SECS: u64 = 20;

/// Bing HTML search provider (no API key required)
pub struct BingHtmlProvider {
    client: Client,
    identities: Arc<dyn UserAgentProvider>,
}

impl BingHtmlProvider {
    /// Create a new Bing provider drawing identities from the given pool
    pub fn new(identities: Arc<dyn UserAgentProvider>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(BING_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, identities }
    }
}

#[async_trait]
impl SearchProvider for BingHtmlProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SourceHit>, SearchError> {
        let response = self
            .client
            .get(BING_SEARCH_URL)
            .query(&[("q", query)])
            .header("User-Agent", self.identities.next_user_agent())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Referer", "https://www.bing.com/")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        timeout_ms: BING_TIMEOUT_SECS * 1000,
                    }
                } else {
                    SearchError::Backend {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(SearchError::Backend {
                status: response.status().as_u16(),
                message: "Bing request failed".to_string(),
            });
        }

        let html = response.text().await.map_err(|e| SearchError::Backend {
            status: 0,
            message: e.to_string(),
        })?;

        Ok(parse_bing_html(&html, num_results))
    }

    fn name(&self) -> &'static str {
        "bing"
    }

    fn priority(&self) -> u8 {
        10 // Primary provider
    }
}

/// Parse the Bing results page, preferring result-header anchors and falling
/// back to any external link when none are present.
fn parse_bing_html(html: &str, max_results: usize) -> Vec<SourceHit> {
    let mut hits = collect_anchor_hits(html, max_results, true);
    if hits.is_empty() {
        hits = collect_anchor_hits(html, max_results, false);
    }
    hits
}

fn collect_anchor_hits(html: &str, max_results: usize, header_only: bool) -> Vec<SourceHit> {
    let mut hits: Vec<SourceHit> = Vec::new();

    for fragment in html.split("<a ").skip(1) {
        if hits.len() >= max_results {
            break;
        }

        let tag_end = match fragment.find('>') {
            Some(pos) => pos,
            None => continue,
        };
        let attrs = &fragment[..tag_end];

        if header_only && !attrs.contains("b_algoheader") {
            continue;
        }

        let url = match attr_value(attrs, "href=\"") {
            Some(href) => href,
            None => continue,
        };

        // Only external result links; Bing sprinkles internal navigation anchors
        if !url.starts_with("http://") && !url.starts_with("https://") {
            continue;
        }
        if url.contains("bing.com") || url.contains("microsoft.com") {
            continue;
        }
        if hits.iter().any(|h| h.url == url) {
            continue;
        }

        let title = fragment[tag_end + 1..]
            .find("</a>")
            .map(|end| strip_tags(&fragment[tag_end + 1..tag_end + 1 + end]))
            .unwrap_or_default();

        hits.push(SourceHit {
            title,
            url,
            snippet: String::new(),
            provider: "bing".to_string(),
        });
    }

    hits
}

/// Extract a quoted attribute value from an anchor tag's attribute string
fn attr_value(attrs: &str, prefix: &str) -> Option<String> {
    let start = attrs.find(prefix)? + prefix.len();
    let end = attrs[start..].find('"')?;
    Some(attrs[start..start + end].to_string())
}

/// Drop nested markup from anchor text, keeping visible characters only
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}
