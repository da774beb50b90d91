// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Evidence aggregation
//!
//! Filters fetched page text down to usable evidence blocks and guarantees
//! the classifier never runs on an empty context: when too few live sources
//! qualify, the jurisdiction's static knowledge block is appended.

use tracing::info;

use crate::content::FetchOutcome;
use crate::jurisdiction::JurisdictionProfile;

/// Evidence assembled for one classification request
///
/// Invariant: `blocks` is never empty; the fallback block is injected
/// whenever fewer than the minimum number of live sources qualify.
#[derive(Debug, Clone)]
pub struct Evidence {
    /// Usable text blocks, in discovery order; the fallback block, when
    /// present, is always last
    pub blocks: Vec<String>,
    /// URLs whose pages qualified, positionally matched to `blocks`
    pub successful_urls: Vec<String>,
    /// Whether the static fallback block was injected
    pub fallback_used: bool,
}

/// Reduces fetch outcomes to evidence blocks
///
/// Aggregation is deterministic: identity rotation and network randomness
/// live upstream in discovery and fetching.
#[derive(Debug, Clone)]
pub struct EvidenceAggregator {
    /// A page qualifies only when its text is strictly longer than this
    min_content_chars: usize,
    /// Below this many qualifying sources, the fallback block is appended
    min_sources: usize,
}

impl EvidenceAggregator {
    /// Create an aggregator with explicit thresholds
    pub fn new(min_content_chars: usize, min_sources: usize) -> Self {
        Self {
            min_content_chars,
            min_sources,
        }
    }

    /// Filter fetch outcomes and inject the fallback block if needed
    pub fn aggregate(&self, outcomes: &[FetchOutcome], profile: &JurisdictionProfile) -> Evidence {
        let mut blocks = Vec::new();
        let mut successful_urls = Vec::new();

        for outcome in outcomes {
            if outcome.text.chars().count() > self.min_content_chars {
                blocks.push(outcome.text.clone());
                successful_urls.push(outcome.url.clone());
            }
        }

        let fallback_used = blocks.len() < self.min_sources;
        if fallback_used {
            info!(
                "Only {} qualifying sources, appending {} fallback knowledge",
                blocks.len(),
                profile.name
            );
            blocks.push(profile.fallback_knowledge.clone());
        }

        Evidence {
            blocks,
            successful_urls,
            fallback_used,
        }
    }
}

impl Default for EvidenceAggregator {
    fn default() -> Self {
        Self::new(500, 3)
    }
}
