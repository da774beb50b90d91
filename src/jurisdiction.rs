// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Jurisdiction profiles
//!
//! Everything region-specific lives here: the query modifier appended to
//! searches, the authority sites always worth consulting, the backup search
//! URLs used when live discovery comes up short, and the static knowledge
//! block injected when too few pages could be fetched. The pipeline itself is
//! jurisdiction-agnostic; callers construct a profile and pass it by
//! reference.

use url::form_urlencoded;

/// Placeholder substituted with the encoded query in backup search URLs
const QUERY_PLACEHOLDER: &str = "{query}";

/// Region-specific data for drug-ban screening
#[derive(Debug, Clone)]
pub struct JurisdictionProfile {
    /// Display name, e.g. "India"
    pub name: String,
    /// Suffix appended to every search query, e.g. "banned drugs in India"
    pub query_suffix: String,
    /// Authority URLs always merged into the candidate set
    pub reliable_sources: Vec<String>,
    /// Backup URLs appended when live search underdelivers; may contain
    /// a `{query}` placeholder
    pub backup_search_urls: Vec<String>,
    /// Static reference text used when fewer than the minimum number of
    /// sources could be fetched
    pub fallback_knowledge: String,
}

impl JurisdictionProfile {
    /// Profile for India, built around CDSCO and allied public-health sources
    pub fn india() -> Self {
        Self {
            name: "India".to_string(),
            query_suffix: "banned drugs in India".to_string(),
            reliable_sources: vec![
                "https://cdsco.gov.in/opencms/opencms/en/Drugs/".to_string(),
                "https://www.nhp.gov.in/drug-banned-in-india_pg".to_string(),
                "https://www.medindia.net/drug-price/".to_string(),
                "https://www.mciindia.org/".to_string(),
                "https://nlem.nic.in/".to_string(),
                "https://www.indianpharmacyjournal.org/".to_string(),
                "https://www.mohfw.gov.in/".to_string(),
                "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC3401704/".to_string(),
            ],
            backup_search_urls: vec![
                "https://cdsco.gov.in/opencms/opencms/en/search/?query={query}".to_string(),
                "https://www.nhp.gov.in/search/site/{query}".to_string(),
                "https://cdsco.gov.in/opencms/opencms/en/Drugs/Drugs/".to_string(),
                "https://www.medindia.net/doctors/drug_information/home.asp".to_string(),
                "https://www.mohfw.gov.in/".to_string(),
            ],
            fallback_knowledge: INDIA_FALLBACK_KNOWLEDGE.to_string(),
        }
    }

    /// Append the jurisdiction modifier to a drug query
    pub fn enhance_query(&self, query: &str) -> String {
        if self.query_suffix.is_empty() {
            query.trim().to_string()
        } else {
            format!("{} {}", query.trim(), self.query_suffix)
        }
    }

    /// Expand backup search URLs for the given (already enhanced) query
    pub fn backup_urls(&self, enhanced_query: &str) -> Vec<String> {
        let encoded: String = form_urlencoded::byte_serialize(enhanced_query.as_bytes()).collect();
        self.backup_search_urls
            .iter()
            .map(|template| template.replace(QUERY_PLACEHOLDER, &encoded))
            .collect()
    }

    /// Merge the reliable authority URLs into a candidate list, skipping
    /// exact duplicates and preserving existing order
    pub fn merge_reliable_sources(&self, urls: &mut Vec<String>) {
        for source in &self.reliable_sources {
            if !urls.contains(source) {
                urls.push(source.clone());
            }
        }
    }
}

const INDIA_FALLBACK_KNOWLEDGE: &str = "\
List of Some Banned Drugs in India:

1. Fixed Dose Combinations (FDCs):
- Nimesulide with Paracetamol
- Aceclofenac with Paracetamol and Rabeprazole
- Metformin with Pioglitazone

2. Individual drugs:
- Phenylpropanolamine: Banned in 2011 due to stroke risk
- Sibutramine: Banned in 2010 due to cardiovascular concerns
- Cisapride: Banned due to cardiac arrhythmia risk
- Valdecoxib: Banned due to cardiovascular complications
- Rofecoxib: Banned due to increased heart attack risk

3. Other notable bans:
- Analgin (Metamizole): Banned due to risk of agranulocytosis
- Some formulations of Diclofenac: Restricted due to vulture population decline
- Oxytocin: Restricted for human use only through public sector to prevent misuse
- Chloramphenicol for veterinary use: Banned due to potential human health risks

Information provided by Central Drugs Standard Control Organization (CDSCO), India.";
