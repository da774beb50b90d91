// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DuckDuckGo search provider
//!
//! Queries DuckDuckGo's HTML interface. No API key required; serves as the
//! fallback provider when Bing yields nothing.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::provider::SearchProvider;
use super::types::{SearchError, SourceHit};
use crate::identity::UserAgentProvider;

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const DDG_TIMEOUT_SECS: u64 = 10;

/// DuckDuckGo search provider (no API key required)
pub struct DuckDuckGoProvider {
    client: Client,
    identities: Arc<dyn UserAgentProvider>,
}

impl DuckDuckGoProvider {
    /// Create a new DuckDuckGo provider drawing identities from the given pool
    pub fn new(identities: Arc<dyn UserAgentProvider>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(DDG_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, identities }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SourceHit>, SearchError> {
        let response = self
            .client
            .post(DDG_HTML_URL)
            .header("User-Agent", self.identities.next_user_agent())
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        timeout_ms: DDG_TIMEOUT_SECS * 1000,
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
                message: "DuckDuckGo request failed".to_string(),
            });
        }

        let html = response.text().await.map_err(|e| SearchError::Backend {
            status: 0,
            message: e.to_string(),
        })?;

        Ok(parse_ddg_html(&html, num_results))
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn priority(&self) -> u8 {
        50 // Fallback provider
    }
}

/// Parse the DuckDuckGo HTML results page
///
/// Result links are `<a class="result__a">` anchors whose hrefs are redirect
/// URLs carrying the destination in the `uddg` parameter.
fn parse_ddg_html(html: &str, max_results: usize) -> Vec<SourceHit> {
    let mut hits = Vec::new();

    for part in html.split("class=\"result__a\"").skip(1) {
        if hits.len() >= max_results {
            break;
        }

        let url = match part.find("href=\"") {
            Some(href_start) => {
                let url_start = href_start + 6;
                match part[url_start..].find('"') {
                    Some(href_end) => resolve_ddg_redirect(&part[url_start..url_start + href_end]),
                    None => continue,
                }
            }
            None => continue,
        };

        if url.is_empty() || url.contains("duckduckgo.com") {
            continue;
        }
        if hits.iter().any(|h: &SourceHit| h.url == url) {
            continue;
        }

        let title = match part.find('>') {
            Some(title_start) => match part[title_start + 1..].find("</a>") {
                Some(title_end) => {
                    html_decode(&part[title_start + 1..title_start + 1 + title_end])
                }
                None => String::new(),
            },
            None => String::new(),
        };

        let snippet = extract_snippet(part);

        hits.push(SourceHit {
            title,
            url,
            snippet,
            provider: "duckduckgo".to_string(),
        });
    }

    hits
}

fn extract_snippet(part: &str) -> String {
    let snippet_pos = match part.find("class=\"result__snippet\"") {
        Some(pos) => pos,
        None => return String::new(),
    };
    let start = match part[snippet_pos..].find('>') {
        Some(rel) => snippet_pos + rel + 1,
        None => return String::new(),
    };
    match part[start..].find("</a>") {
        Some(end) => html_decode(&part[start..start + end]),
        None => String::new(),
    }
}

/// Resolve DuckDuckGo's redirect URL to the destination
///
/// Redirect hrefs look like `//duckduckgo.com/l/?uddg=https%3A%2F%2F...&rut=...`.
fn resolve_ddg_redirect(redirect_url: &str) -> String {
    if let Some(uddg_pos) = redirect_url.find("uddg=") {
        let url_start = uddg_pos + 5;
        let url_end = redirect_url[url_start..]
            .find('&')
            .unwrap_or(redirect_url.len() - url_start);
        url_decode(&redirect_url[url_start..url_start + url_end])
    } else if redirect_url.starts_with("http") {
        redirect_url.to_string()
    } else {
        String::new()
    }
}

/// Simple percent-decoding for redirect parameters
fn url_decode(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            }
        } else if c == '+' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

/// Simple HTML entity decoding plus tag stripping for anchor text
fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .split('<')
        .map(|part| {
            if let Some(pos) = part.find('>') {
                &part[pos + 1..]
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticUserAgent;

    #[test]
    fn test_ddg_provider_creation() {
        let provider = DuckDuckGoProvider::new(Arc::new(StaticUserAgent("Test/1.0".to_string())));
        assert_eq!(provider.name(), "duckduckgo");
        assert_eq!(provider.priority(), 50);
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(
            url_decode("https%3A%2F%2Fexample.com"),
            "https://example.com"
        );
        assert_eq!(url_decode("hello+world"), "hello world");
    }

    #[test]
    fn test_html_decode() {
        assert_eq!(html_decode("Nimesulide &amp; Paracetamol"), "Nimesulide & Paracetamol");
        assert_eq!(html_decode("<b>bold</b> text"), "bold text");
        assert_eq!(html_decode("plain text"), "plain text");
    }

    #[test]
    fn test_resolve_ddg_redirect() {
        let redirect = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=abc";
        assert_eq!(resolve_ddg_redirect(redirect), "https://example.com");

        let direct = "https://example.com";
        assert_eq!(resolve_ddg_redirect(direct), "https://example.com");
    }

    #[test]
    fn test_parse_ddg_results() {
        let html = r##"
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fcdsco.gov.in%2Fbanned">Banned list</a>
            <a class="result__snippet" href="#">Official list of prohibited drugs</a>
        "##;
        // Snippet anchor follows the result anchor in the same fragment
        let hits = parse_ddg_html(html, 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://cdsco.gov.in/banned");
        assert_eq!(hits[0].title, "Banned list");
    }

    #[test]
    fn test_parse_empty_html() {
        assert!(parse_ddg_html("", 10).is_empty());
    }
}
