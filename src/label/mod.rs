// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Product-label extraction from images
//!
//! Reads pharmaceutical label photographs with the multimodal LLM and
//! recovers a fixed-key JSON record. The result feeds the classification
//! pipeline as additional context.

pub mod extractor;

pub use extractor::{LabelError, LabelExtractor, ProductLabel};
