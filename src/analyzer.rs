// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Product screening entry point
//!
//! Composes the fast path and the slow path: a confident fuzzy hit against
//! the banned-drug registry answers immediately; everything else goes
//! through the full web-evidence classification pipeline.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classify::{ClassifyError, DrugBanClassifier, DrugBanReport};
use crate::registry::BannedDrugRegistry;

/// Verdict from a registry short-circuit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryVerdict {
    /// Registry entry the product name matched
    pub matched_drug: String,
    /// Gazette notification number declaring the ban
    pub notification_no: String,
    /// Notification date
    pub date: String,
    /// Similarity score of the match, 0-100
    pub similarity: u8,
}

/// Outcome of screening one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScreeningOutcome {
    /// The name matched the banned-drug registry; no pipeline run was needed
    RegistryHit(RegistryVerdict),
    /// The full classification pipeline ran
    Classified(DrugBanReport),
}

/// Screens products against the registry, then the classification pipeline
pub struct ProductAnalyzer {
    registry: BannedDrugRegistry,
    classifier: DrugBanClassifier,
}

impl ProductAnalyzer {
    /// Create an analyzer from its two collaborators
    pub fn new(registry: BannedDrugRegistry, classifier: DrugBanClassifier) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Screen one product
    ///
    /// `additional_info` is free-form context for the pipeline path,
    /// typically extracted label data rendered as JSON.
    pub async fn screen(
        &self,
        product_name: &str,
        additional_info: &str,
    ) -> Result<ScreeningOutcome, ClassifyError> {
        if let Some(hit) = self.registry.best_match(product_name) {
            info!(
                "Registry hit for '{}': {} (score {})",
                product_name, hit.record.drug_name, hit.score
            );
            return Ok(ScreeningOutcome::RegistryHit(RegistryVerdict {
                matched_drug: hit.record.drug_name.clone(),
                notification_no: hit.record.notification_no.clone(),
                date: hit.record.date.clone(),
                similarity: hit.score,
            }));
        }

        info!(
            "No registry match for '{}', running classification pipeline",
            product_name
        );
        let report = self
            .classifier
            .classify(product_name, additional_info)
            .await?;
        Ok(ScreeningOutcome::Classified(report))
    }
}
