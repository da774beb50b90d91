// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end classification pipeline tests
//!
//! These tests run the full discover → fetch → aggregate → synthesize →
//! parse sequence offline: search providers are stubbed, candidate URLs
//! point at blocked internal addresses (so fetching deterministically yields
//! empty text), and the LLM is scripted.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pharmascreen::classify::{CLASSIFICATION_MAX_TOKENS, CLASSIFICATION_TEMPERATURE};
use pharmascreen::search::SearchError;
use pharmascreen::{
    ClassifyError, CompletionClient, CompletionRequest, ConfidenceTier, ContentFetcher,
    DrugBanClassifier, DrugClassification, EvidenceAggregator, FetchConfig, JurisdictionProfile,
    LlmError, SearchConfig, SearchProvider, SourceDiscovery, SourceHit, StaticUserAgent,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

struct ScriptedLlm {
    response: Option<&'static str>,
    calls: AtomicUsize,
    last_prompt: Mutex<String>,
}

impl ScriptedLlm {
    fn answering(response: &'static str) -> Arc<Self> {
        Arc::new(Self {
            response: Some(response),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(String::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(String::new()),
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedLlm {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = request.prompt.clone();
        match self.response {
            Some(text) => Ok(text.to_string()),
            None => Err(LlmError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            }),
        }
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

struct EmptyProvider;

#[async_trait]
impl SearchProvider for EmptyProvider {
    async fn search(&self, _query: &str, _n: usize) -> Result<Vec<SourceHit>, SearchError> {
        Ok(vec![])
    }

    fn name(&self) -> &'static str {
        "empty"
    }
}

struct BrokenProvider;

#[async_trait]
impl SearchProvider for BrokenProvider {
    async fn search(&self, _query: &str, _n: usize) -> Result<Vec<SourceHit>, SearchError> {
        Err(SearchError::Backend {
            status: 502,
            message: "bad gateway".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Jurisdiction whose URLs all resolve to blocked internal hosts, keeping
/// every fetch offline and instantly empty
fn offline_profile() -> JurisdictionProfile {
    let mut profile = JurisdictionProfile::india();
    profile.backup_search_urls = vec![
        "http://127.0.0.1/search?q={query}".to_string(),
        "http://127.0.0.1/drugs".to_string(),
    ];
    profile.reliable_sources = vec![
        "http://127.0.0.1/authority-a".to_string(),
        "http://127.0.0.1/authority-b".to_string(),
    ];
    profile
}

fn classifier_with(
    provider: Box<dyn SearchProvider>,
    llm: Arc<dyn CompletionClient>,
) -> DrugBanClassifier {
    let discovery = SourceDiscovery::with_providers(SearchConfig::default(), vec![provider]);
    let fetcher = ContentFetcher::new(
        FetchConfig {
            timeout_secs: 1,
            concurrency: Some(2),
        },
        Arc::new(StaticUserAgent("IntegrationTest/1.0".to_string())),
    );

    DrugBanClassifier::with_components(
        discovery,
        fetcher,
        EvidenceAggregator::default(),
        llm,
        offline_profile(),
    )
}

const FULL_RESPONSE: &str = r#"Reviewing the evidence provided:
<output>
<classification> Banned </classification>
<detailed_classification> BANNED </detailed_classification>
<confidence_level> HIGH </confidence_level>
<justification> Source 1 lists the drug in the CDSCO prohibition gazette. </justification>
<alternative_status> None </alternative_status>
<relevant_regulations> Drugs and Cosmetics Act, Section 26A </relevant_regulations>
</output>"#;

#[tokio::test]
async fn pipeline_produces_typed_verdict_fully_offline() {
    init_tracing();
    let llm = ScriptedLlm::answering(FULL_RESPONSE);
    let classifier = classifier_with(Box::new(EmptyProvider), llm.clone());

    let report = classifier.classify("nimesulide", "{}").await.unwrap();

    let verdict = report.verdict.expect("verdict should parse");
    assert_eq!(verdict.detailed_label(), Some(DrugClassification::Banned));
    assert_eq!(verdict.confidence(), Some(ConfidenceTier::High));
    assert_eq!(
        verdict.justification.as_deref(),
        Some("Source 1 lists the drug in the CDSCO prohibition gazette.")
    );
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn pipeline_survives_total_network_failure() {
    init_tracing();
    // Discovery errors out AND every fetch fails: the fallback knowledge
    // block must still reach the model.
    let llm = ScriptedLlm::answering(FULL_RESPONSE);
    let classifier = classifier_with(Box::new(BrokenProvider), llm.clone());

    let report = classifier.classify("sibutramine", "{}").await.unwrap();

    assert!(report.fallback_used);
    assert_eq!(report.evidence_blocks, 1);
    assert!(report.sources_analyzed.is_empty());

    let prompt = llm.last_prompt.lock().unwrap().clone();
    assert!(prompt.contains("Sibutramine"));
    assert!(prompt.contains("sibutramine"));
}

#[tokio::test]
async fn pipeline_prompt_carries_contract_and_context() {
    let llm = ScriptedLlm::answering(FULL_RESPONSE);
    let classifier = classifier_with(Box::new(EmptyProvider), llm.clone());

    classifier
        .classify("nimesulide", r#"{"Formulation Type": "Tablet"}"#)
        .await
        .unwrap();

    let prompt = llm.last_prompt.lock().unwrap().clone();
    assert!(prompt.contains("banned in India"));
    assert!(prompt.contains(r#"{"Formulation Type": "Tablet"}"#));
    assert!(prompt.contains("<output>"));
    assert!(prompt.contains("<relevant_regulations>"));
}

#[tokio::test]
async fn unparseable_response_is_a_null_verdict_not_an_error() {
    let llm = ScriptedLlm::answering("The drug appears to be banned, but I cannot be sure.");
    let classifier = classifier_with(Box::new(EmptyProvider), llm);

    let report = classifier.classify("analgin", "{}").await.unwrap();

    assert!(report.verdict.is_none());
    assert!(report.raw_response.contains("cannot be sure"));
}

#[tokio::test]
async fn llm_invocation_failure_propagates_as_typed_error() {
    let llm = ScriptedLlm::failing();
    let classifier = classifier_with(Box::new(EmptyProvider), llm);

    let result = classifier.classify("analgin", "{}").await;
    assert!(matches!(result, Err(ClassifyError::Llm(_))));
}

#[tokio::test]
async fn classification_request_uses_deterministic_decoding() {
    assert_eq!(CLASSIFICATION_TEMPERATURE, 0.0);
    assert_eq!(CLASSIFICATION_MAX_TOKENS, 4000);

    let request = CompletionRequest::text("prompt", CLASSIFICATION_MAX_TOKENS, CLASSIFICATION_TEMPERATURE);
    assert!(request.images.is_empty());
}
