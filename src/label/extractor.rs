// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label extraction via the multimodal LLM

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::llm::{CompletionClient, CompletionRequest, ImagePayload, LlmError};

const LABEL_MAX_TOKENS: u32 = 1700;
const LABEL_TEMPERATURE: f32 = 0.1;

const LABEL_PROMPT: &str = r#"You are an expert in pharmaceutical regulations and drug classification. Given an image of a pharmaceutical product label, perform the following tasks:

1. **Extract and structure the following pharmaceutical information:**
   - **Product Name**
   - **Salt Composition**
   - **Dosage Strength**
   - **Formulation Type** (e.g., Tablet, Capsule, Syrup)
   - **Quantity** (e.g., 10 Tablets, 100 Capsules)
   - **Prescription Status** (Rx Only, OTC, Controlled Drug)
   - **Manufacturer**
2. **Return the structured JSON output with these details:**
```json
{
    "Product Name": "<Extracted Product Name>",
    "Salt Composition": "<Extracted Salt Composition>",
    "Dosage Strength": "<Extracted Dosage Strength>",
    "Formulation Type": "<Extracted Formulation>",
    "Quantity": "<Extracted Quantity>",
    "Prescription Status": "<Rx Only / OTC / Controlled Drug / NA>",
    "Manufacturer": "<Extracted Manufacturer>"
}
```"#;

/// Structured data read off a product label
///
/// Field names on the wire are the fixed keys the extraction prompt asks
/// for; absent fields deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProductLabel {
    #[serde(rename = "Product Name")]
    pub product_name: Option<String>,
    #[serde(rename = "Salt Composition")]
    pub salt_composition: Option<String>,
    #[serde(rename = "Dosage Strength")]
    pub dosage_strength: Option<String>,
    #[serde(rename = "Formulation Type")]
    pub formulation_type: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
    #[serde(rename = "Prescription Status")]
    pub prescription_status: Option<String>,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: Option<String>,
}

/// Failure modes of label extraction
#[derive(Debug, Error)]
pub enum LabelError {
    /// The LLM invocation itself failed
    #[error("LLM invocation failed: {0}")]
    Llm(#[from] LlmError),

    /// The response carries no JSON object
    #[error("No JSON object found in model response")]
    NoJson,

    /// A JSON object was found but does not match the label contract
    #[error("Label JSON could not be parsed: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Extracts structured label data from product images
pub struct LabelExtractor {
    llm: Arc<dyn CompletionClient>,
}

impl LabelExtractor {
    /// Create an extractor over the shared completion client
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self { llm }
    }

    /// Read one or more label images into a structured record
    pub async fn extract(&self, images: &[ImagePayload]) -> Result<ProductLabel, LabelError> {
        let request = CompletionRequest {
            prompt: LABEL_PROMPT.to_string(),
            images: images.to_vec(),
            max_tokens: LABEL_MAX_TOKENS,
            temperature: LABEL_TEMPERATURE,
        };

        let raw = self.llm.complete(&request).await?;
        debug!("Label extraction returned {} chars", raw.len());

        let json = extract_json_block(&raw).ok_or(LabelError::NoJson)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Pull the JSON object out of free-form model text
///
/// Prefers a ```json fenced block; falls back to the outermost brace pair.
fn extract_json_block(text: &str) -> Option<String> {
    let fence = Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("valid fence pattern");
    if let Some(caps) = fence.captures(text) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    let bare = Regex::new(r"(?s)(\{.*\})").expect("valid brace pattern");
    bare.captures(text)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
}
