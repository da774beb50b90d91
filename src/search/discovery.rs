// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Source discovery orchestration
//!
//! Coordinates search providers, backup-URL top-up, and the per-minute query
//! budget. Discovery is best-effort: every failure degrades to fewer
//! (possibly zero) URLs, never to an error, because the caller always merges
//! in the jurisdiction's reliable sources afterwards.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::bing::BingHtmlProvider;
use super::config::SearchConfig;
use super::duckduckgo::DuckDuckGoProvider;
use super::provider::SearchProvider;
use crate::identity::UserAgentProvider;
use crate::jurisdiction::JurisdictionProfile;

/// Per-minute allowance of live search-engine queries
///
/// Scraped search endpoints throttle or captcha-wall clients that query too
/// often, and one blocked identity poisons the whole rotation pool. A single
/// budget covers every provider, since the engines see the same egress
/// address regardless of which one is asked.
type SearchBudget = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Discovers candidate evidence URLs for a drug query
pub struct SourceDiscovery {
    providers: Vec<Box<dyn SearchProvider>>,
    search_budget: SearchBudget,
    config: SearchConfig,
}

impl SourceDiscovery {
    /// Create a discovery service with the default provider set
    /// (Bing primary, DuckDuckGo fallback)
    pub fn new(config: SearchConfig, identities: Arc<dyn UserAgentProvider>) -> Self {
        let providers: Vec<Box<dyn SearchProvider>> = vec![
            Box::new(BingHtmlProvider::new(identities.clone())),
            Box::new(DuckDuckGoProvider::new(identities)),
        ];
        Self::with_providers(config, providers)
    }

    /// Create a discovery service over an explicit provider set
    pub fn with_providers(config: SearchConfig, mut providers: Vec<Box<dyn SearchProvider>>) -> Self {
        // Sort by priority (lower = preferred)
        providers.sort_by_key(|p| p.priority());

        let queries_per_minute = NonZeroU32::new(config.rate_limit_per_minute.max(1))
            .expect("clamped above zero");
        let search_budget = RateLimiter::direct(Quota::per_minute(queries_per_minute));

        Self {
            providers,
            search_budget,
            config,
        }
    }

    /// Discover candidate URLs for a drug query
    ///
    /// Tries providers in priority order; if the best provider run still
    /// yields fewer than half the desired count, jurisdiction backup URLs are
    /// appended (deduplicated) until the desired count is reached or the
    /// backups are exhausted. Failures yield an empty list, never an error.
    pub async fn discover(&self, query: &str, profile: &JurisdictionProfile) -> Vec<String> {
        let desired = self.config.desired_results;
        let enhanced = profile.enhance_query(query);

        // The budget is checked, never awaited: drug queries arrive one
        // product at a time from an interactive caller, and a spent
        // allowance means this request falls through to the jurisdiction's
        // backup and authority URLs instead of stalling the pipeline until
        // a token frees up.
        let mut urls = if self.search_budget.check().is_ok() {
            self.provider_search(&enhanced, desired).await
        } else {
            warn!(
                "Search budget for this minute is spent, skipping live discovery for '{}'",
                enhanced
            );
            Vec::new()
        };

        if urls.len() < desired / 2 {
            debug!(
                "Only {} live results for '{}', topping up from backup sources",
                urls.len(),
                enhanced
            );
            for backup in profile.backup_urls(&enhanced) {
                if urls.len() >= desired {
                    break;
                }
                if !urls.contains(&backup) {
                    urls.push(backup);
                }
            }
        }

        urls.truncate(desired);
        urls
    }

    async fn provider_search(&self, query: &str, desired: usize) -> Vec<String> {
        let start = Instant::now();

        for provider in &self.providers {
            debug!("Trying search provider: {}", provider.name());

            match provider.search(query, desired).await {
                Ok(hits) if !hits.is_empty() => {
                    info!(
                        "Discovery found {} sources via {} in {}ms",
                        hits.len(),
                        provider.name(),
                        start.elapsed().as_millis()
                    );
                    let mut urls = Vec::with_capacity(hits.len());
                    for hit in hits {
                        if !urls.contains(&hit.url) {
                            urls.push(hit.url);
                        }
                    }
                    return urls;
                }
                Ok(_) => {
                    debug!("Provider {} returned no results, trying next", provider.name());
                }
                Err(e) => {
                    warn!("Search provider {} failed: {}, trying next", provider.name(), e);
                }
            }
        }

        Vec::new()
    }
}
