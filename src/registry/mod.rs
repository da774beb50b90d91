// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static reference data
//!
//! Two lookup tables loaded once at startup and passed by reference:
//! the jurisdiction's banned-drug registry (used to short-circuit the
//! pipeline on a confident name match) and the product-to-image-URL catalog
//! for listings without uploaded photos.

pub mod matcher;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

pub use matcher::similarity_ratio;

/// Minimum similarity score for a registry hit
pub const MATCH_THRESHOLD: u8 = 80;

/// One entry of the official banned-drug list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannedDrugRecord {
    /// Name of the banned drug or fixed dose combination
    pub drug_name: String,
    /// Gazette notification number declaring the ban
    pub notification_no: String,
    /// Notification date as printed in the gazette
    pub date: String,
}

/// A registry entry matched against a queried product name
#[derive(Debug, Clone)]
pub struct RegistryMatch<'a> {
    /// The matched registry record
    pub record: &'a BannedDrugRecord,
    /// Similarity score, 0-100
    pub score: u8,
}

/// Errors loading reference data files
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Filesystem failure
    #[error("Failed to read reference data: {0}")]
    Io(#[from] std::io::Error),

    /// The file content is not the expected JSON shape
    #[error("Failed to parse reference data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Wire shape of the registry file
#[derive(Deserialize)]
struct RegistryFile {
    banned_drugs: Vec<BannedDrugRecord>,
}

/// The jurisdiction's banned-drug registry with fuzzy lookup
#[derive(Debug, Clone)]
pub struct BannedDrugRegistry {
    records: Vec<BannedDrugRecord>,
}

impl BannedDrugRegistry {
    /// Build a registry from in-memory records
    pub fn from_records(records: Vec<BannedDrugRecord>) -> Self {
        Self { records }
    }

    /// Load a registry from a JSON file with a top-level `banned_drugs` array
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let reader = BufReader::new(File::open(path)?);
        let file: RegistryFile = serde_json::from_reader(reader)?;
        Ok(Self::from_records(file.banned_drugs))
    }

    /// Number of records in the registry
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best fuzzy match for a product name at or above the threshold
    ///
    /// Scans every record and keeps the highest-scoring one; ties keep the
    /// earlier record. Returns `None` when nothing reaches
    /// [`MATCH_THRESHOLD`].
    pub fn best_match(&self, product_name: &str) -> Option<RegistryMatch<'_>> {
        let mut best: Option<RegistryMatch<'_>> = None;

        for record in &self.records {
            let score = similarity_ratio(product_name, &record.drug_name);
            if score < MATCH_THRESHOLD {
                continue;
            }
            match &best {
                Some(current) if current.score >= score => {}
                _ => best = Some(RegistryMatch { record, score }),
            }
        }

        best
    }
}

/// Product-identifier to image-URL lookup table
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    entries: HashMap<String, Vec<String>>,
}

impl ImageCatalog {
    /// Build a catalog from an in-memory map
    pub fn from_map(entries: HashMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Load a catalog from a JSON object of product id → URL list
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let reader = BufReader::new(File::open(path)?);
        let entries: HashMap<String, Vec<String>> = serde_json::from_reader(reader)?;
        Ok(Self::from_map(entries))
    }

    /// Image URLs known for a product identifier
    pub fn urls_for(&self, product_id: &str) -> Option<&[String]> {
        self.entries.get(product_id).map(|urls| urls.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(name: &str) -> BannedDrugRecord {
        BannedDrugRecord {
            drug_name: name.to_string(),
            notification_no: "X.11014/1/2018-DRS".to_string(),
            date: "07.01.2019".to_string(),
        }
    }

    fn registry() -> BannedDrugRegistry {
        BannedDrugRegistry::from_records(vec![
            record("Nimesulide"),
            record("Sibutramine"),
            record("Phenylpropanolamine"),
        ])
    }

    #[test]
    fn test_exact_match_scores_100() {
        let registry = registry();
        let hit = registry.best_match("Nimesulide").unwrap();
        assert_eq!(hit.score, 100);
        assert_eq!(hit.record.drug_name, "Nimesulide");
    }

    #[test]
    fn test_near_match_above_threshold() {
        let registry = registry();
        let hit = registry.best_match("Sibutramin").unwrap();
        assert!(hit.score >= MATCH_THRESHOLD);
        assert_eq!(hit.record.drug_name, "Sibutramine");
    }

    #[test]
    fn test_unrelated_name_yields_no_match() {
        let registry = registry();
        assert!(registry.best_match("Vitamin C chewable").is_none());
    }

    #[test]
    fn test_empty_registry_yields_no_match() {
        let registry = BannedDrugRegistry::from_records(vec![]);
        assert!(registry.is_empty());
        assert!(registry.best_match("Nimesulide").is_none());
    }

    #[test]
    fn test_best_of_multiple_candidates_wins() {
        let registry = BannedDrugRegistry::from_records(vec![
            record("Nimesulide with Paracetamol"),
            record("Nimesulide"),
        ]);
        let hit = registry.best_match("Nimesulide").unwrap();
        assert_eq!(hit.record.drug_name, "Nimesulide");
    }

    #[test]
    fn test_registry_loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"banned_drugs": [
                {{"drug_name": "Cisapride", "notification_no": "GSR 82(E)", "date": "12.03.2011"}}
            ]}}"#
        )
        .unwrap();

        let registry = BannedDrugRegistry::load_from_path(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.best_match("Cisapride").is_some());
    }

    #[test]
    fn test_registry_load_rejects_wrong_shape() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["not", "the", "expected", "shape"]"#).unwrap();

        assert!(matches!(
            BannedDrugRegistry::load_from_path(file.path()),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_registry_load_missing_file() {
        assert!(matches!(
            BannedDrugRegistry::load_from_path("/nonexistent/banned_drugs.json"),
            Err(RegistryError::Io(_))
        ));
    }

    #[test]
    fn test_image_catalog_lookup() {
        let mut entries = HashMap::new();
        entries.insert(
            "PC-1001".to_string(),
            vec!["https://img.example/1.jpg".to_string()],
        );
        let catalog = ImageCatalog::from_map(entries);

        assert_eq!(
            catalog.urls_for("PC-1001"),
            Some(&["https://img.example/1.jpg".to_string()][..])
        );
        assert!(catalog.urls_for("PC-9999").is_none());
    }

    #[test]
    fn test_image_catalog_loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"PC-1001": ["https://img.example/1.jpg", "https://img.example/2.jpg"]}}"#
        )
        .unwrap();

        let catalog = ImageCatalog::load_from_path(file.path()).unwrap();
        assert_eq!(catalog.urls_for("PC-1001").unwrap().len(), 2);
    }
}
