// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Drug-ban classification pipeline
//!
//! Runs the full sequence for one request:
//! discovery → parallel fetch → aggregation → LLM synthesis → parsing.
//! The stages before synthesis are best-effort and can only shrink the
//! evidence; the LLM invocation is the single failure point surfaced to the
//! caller.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::parser::parse_classification;
use super::prompt::{
    build_classification_prompt, CLASSIFICATION_MAX_TOKENS, CLASSIFICATION_TEMPERATURE,
};
use super::types::{ClassifyError, DrugBanReport};
use crate::content::{ContentFetcher, FetchConfig};
use crate::evidence::EvidenceAggregator;
use crate::identity::{RotatingUserAgentPool, UserAgentProvider};
use crate::jurisdiction::JurisdictionProfile;
use crate::llm::{CompletionClient, CompletionRequest};
use crate::search::{SearchConfig, SourceDiscovery};

/// End-to-end drug-ban classifier
pub struct DrugBanClassifier {
    discovery: SourceDiscovery,
    fetcher: ContentFetcher,
    aggregator: EvidenceAggregator,
    llm: Arc<dyn CompletionClient>,
    profile: JurisdictionProfile,
}

impl DrugBanClassifier {
    /// Create a classifier with default discovery and fetching components
    pub fn new(llm: Arc<dyn CompletionClient>, profile: JurisdictionProfile) -> Self {
        let identities: Arc<dyn UserAgentProvider> = Arc::new(RotatingUserAgentPool::with_defaults());
        Self::with_components(
            SourceDiscovery::new(SearchConfig::from_env(), identities.clone()),
            ContentFetcher::new(FetchConfig::from_env(), identities),
            EvidenceAggregator::default(),
            llm,
            profile,
        )
    }

    /// Create a classifier from explicitly constructed components
    pub fn with_components(
        discovery: SourceDiscovery,
        fetcher: ContentFetcher,
        aggregator: EvidenceAggregator,
        llm: Arc<dyn CompletionClient>,
        profile: JurisdictionProfile,
    ) -> Self {
        Self {
            discovery,
            fetcher,
            aggregator,
            llm,
            profile,
        }
    }

    /// Classify one drug
    ///
    /// `additional_info` is free-form context (typically label data rendered
    /// as JSON) embedded verbatim into the prompt.
    ///
    /// Returns `Err` only when the LLM invocation itself fails. An
    /// unparseable model response produces `Ok` with `verdict: None`.
    pub async fn classify(
        &self,
        drug_info: &str,
        additional_info: &str,
    ) -> Result<DrugBanReport, ClassifyError> {
        info!("Starting classification for: {}", drug_info);

        // Candidate URLs: live discovery topped up with the jurisdiction's
        // reliable authorities. Never empty, even fully offline.
        let mut urls = self.discovery.discover(drug_info, &self.profile).await;
        self.profile.merge_reliable_sources(&mut urls);
        info!("Found {} sources to analyze", urls.len());

        // One parallel fetch stage with a join barrier; everything after
        // this point is sequential.
        let outcomes = self.fetcher.fetch_all(&urls).await;

        let evidence = self.aggregator.aggregate(&outcomes, &self.profile);

        let prompt = build_classification_prompt(
            &self.profile.name,
            drug_info,
            additional_info,
            &evidence.blocks,
        );
        let request = CompletionRequest::text(
            prompt,
            CLASSIFICATION_MAX_TOKENS,
            CLASSIFICATION_TEMPERATURE,
        );
        let raw_response = self.llm.complete(&request).await?;

        let verdict = match parse_classification(&raw_response) {
            Ok(verdict) => Some(verdict),
            Err(e) => {
                warn!("Could not parse classification response: {}", e);
                None
            }
        };

        Ok(DrugBanReport {
            drug_info: drug_info.to_string(),
            verdict,
            raw_response,
            sources_analyzed: evidence.successful_urls,
            evidence_blocks: evidence.blocks.len(),
            fallback_used: evidence.fallback_used,
            generated_at: Utc::now(),
        })
    }

    /// The jurisdiction this classifier screens against
    pub fn jurisdiction(&self) -> &JurisdictionProfile {
        &self.profile
    }
}
