// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Structured-output parsing
//!
//! The model is instructed to wrap its verdict in a fixed-tag `<output>`
//! block. That block is a wire format: this parser locates it, checks the
//! tag tree is well-formed, and lifts the six expected fields into a
//! `ClassificationVerdict`. A missing field degrades to `None`; a missing or
//! broken block is a typed failure.

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

use super::types::ClassificationVerdict;

/// Failure modes of structured-output parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The response contains no `<output>...</output>` block
    #[error("No structured <output> block found in model response")]
    NoStructuredOutput,

    /// The block exists but its tag tree is not well-formed
    #[error("Malformed structured output: {0}")]
    MalformedOutput(String),
}

/// Parse a raw model response into a classification verdict
///
/// Scans for the first `<output>...</output>` region (non-greedy, newlines
/// included), ignoring any prose before or after it, then parses the region
/// as a tag tree. Parsing is deterministic and idempotent.
pub fn parse_classification(raw: &str) -> Result<ClassificationVerdict, ParseError> {
    let block = extract_output_block(raw).ok_or(ParseError::NoStructuredOutput)?;
    let mut fields = parse_tag_tree(block)?;

    Ok(ClassificationVerdict {
        classification: fields.remove("classification"),
        detailed_classification: fields.remove("detailed_classification"),
        confidence_level: fields.remove("confidence_level"),
        justification: fields.remove("justification"),
        alternative_status: fields.remove("alternative_status"),
        relevant_regulations: fields.remove("relevant_regulations"),
    })
}

/// Locate the first `<output>...</output>` region
fn extract_output_block(raw: &str) -> Option<&str> {
    let re = Regex::new(r"(?s)<output>.*?</output>").expect("valid output-block pattern");
    re.find(raw.trim()).map(|m| m.as_str())
}

/// Parse the block into a map of direct-child tag name → trimmed text
///
/// The root must be `output`. Tags inside a field contribute their text to
/// that field; mismatched or unclosed tags fail the parse.
fn parse_tag_tree(block: &str) -> Result<HashMap<String, String>, ParseError> {
    let mut stack: Vec<String> = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut field_text = String::new();
    let mut pos = 0;

    while pos < block.len() {
        let rest = &block[pos..];
        let open = match rest.find('<') {
            Some(idx) => idx,
            None => break,
        };

        // Text up to the next tag belongs to the innermost open field
        if stack.len() >= 2 {
            field_text.push_str(&rest[..open]);
        }

        let tag_close = rest[open..]
            .find('>')
            .ok_or_else(|| ParseError::MalformedOutput("unterminated tag".to_string()))?;
        let tag_body = &rest[open + 1..open + tag_close];

        if let Some(name) = tag_body.strip_prefix('/') {
            let expected = stack.pop().ok_or_else(|| {
                ParseError::MalformedOutput(format!("unexpected closing tag </{}>", name))
            })?;
            if expected != name {
                return Err(ParseError::MalformedOutput(format!(
                    "expected </{}>, found </{}>",
                    expected, name
                )));
            }
            if stack.len() == 1 {
                // A direct child of the root just closed
                fields.insert(name.to_string(), field_text.trim().to_string());
                field_text.clear();
            }
        } else if tag_body.ends_with('/') {
            // Self-closing tags carry no field text
        } else {
            let name = tag_body
                .split_whitespace()
                .next()
                .filter(|n| !n.is_empty())
                .ok_or_else(|| ParseError::MalformedOutput("empty tag name".to_string()))?;
            if stack.is_empty() && name != "output" {
                return Err(ParseError::MalformedOutput(format!(
                    "expected root tag 'output', got '{}'",
                    name
                )));
            }
            stack.push(name.to_string());
        }

        pos += open + tag_close + 1;
    }

    if !stack.is_empty() {
        return Err(ParseError::MalformedOutput(format!(
            "unclosed tag <{}>",
            stack.last().expect("non-empty stack")
        )));
    }

    Ok(fields)
}
