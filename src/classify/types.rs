// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for drug-ban classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmError;

/// Canonical legal-status categories for a drug in the target jurisdiction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrugClassification {
    /// Completely illegal for all uses
    Banned,
    /// Regulated with usage restrictions but not prohibited
    Controlled,
    /// Legal, available only with a valid prescription
    PrescriptionOnly,
    /// Legally available without restrictions
    OpenForSale,
}

impl DrugClassification {
    /// Canonical label string as it appears in the output contract
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Banned => "BANNED",
            Self::Controlled => "CONTROLLED DRUG (Not Banned)",
            Self::PrescriptionOnly => "PRESCRIPTION-BASED DRUG (Not Banned)",
            Self::OpenForSale => "OPEN FOR SALE (Not Banned)",
        }
    }

    /// Lenient recovery from model-produced text
    ///
    /// "BANNED" must be checked last: every other canonical label contains
    /// the word "Banned" in its parenthetical.
    pub fn from_response_text(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        if upper.contains("CONTROLLED") {
            Some(Self::Controlled)
        } else if upper.contains("PRESCRIPTION") {
            Some(Self::PrescriptionOnly)
        } else if upper.contains("OPEN FOR SALE") {
            Some(Self::OpenForSale)
        } else if upper.contains("BANNED") {
            Some(Self::Banned)
        } else {
            None
        }
    }
}

impl std::fmt::Display for DrugClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model-reported confidence in its classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Lenient recovery from model-produced text
    pub fn from_response_text(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        if upper.contains("HIGH") {
            Some(Self::High)
        } else if upper.contains("MEDIUM") {
            Some(Self::Medium)
        } else if upper.contains("LOW") {
            Some(Self::Low)
        } else {
            None
        }
    }
}

/// The six tagged fields recovered from a structured model response
///
/// Every field is optional: a missing tag degrades that field to `None`
/// without failing the parse. Values are stored exactly as produced,
/// trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClassificationVerdict {
    /// Coarse verdict ("Banned" / "Not Banned")
    pub classification: Option<String>,
    /// One of the four canonical labels
    pub detailed_classification: Option<String>,
    /// LOW / MEDIUM / HIGH
    pub confidence_level: Option<String>,
    /// Key evidence supporting the classification
    pub justification: Option<String>,
    /// Restriction status when not banned
    pub alternative_status: Option<String>,
    /// Regulatory acts or notifications cited
    pub relevant_regulations: Option<String>,
}

impl ClassificationVerdict {
    /// Typed view of the detailed classification, when recognizable
    pub fn detailed_label(&self) -> Option<DrugClassification> {
        self.detailed_classification
            .as_deref()
            .and_then(DrugClassification::from_response_text)
    }

    /// Typed view of the confidence tier, when recognizable
    pub fn confidence(&self) -> Option<ConfidenceTier> {
        self.confidence_level
            .as_deref()
            .and_then(ConfidenceTier::from_response_text)
    }
}

/// Full result of one classification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugBanReport {
    /// The drug name or description that was screened
    pub drug_info: String,
    /// Parsed verdict; `None` when the model response had no usable
    /// structured block
    pub verdict: Option<ClassificationVerdict>,
    /// Raw model response, kept for auditing
    pub raw_response: String,
    /// URLs whose content qualified as evidence, in discovery order
    pub sources_analyzed: Vec<String>,
    /// Number of evidence blocks given to the model
    pub evidence_blocks: usize,
    /// Whether static fallback knowledge was part of the evidence
    pub fallback_used: bool,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
}

/// Errors that abort a classification run
///
/// Discovery and fetch failures never surface here; they degrade to fallback
/// evidence upstream. Parse failures yield a report with `verdict: None`.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The LLM invocation itself failed
    #[error("LLM invocation failed: {0}")]
    Llm(#[from] LlmError),
}
