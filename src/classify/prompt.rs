// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification prompt construction
//!
//! The prompt is a fixed contract: task framing, the four canonical
//! classification definitions, analysis instructions, and the tagged output
//! structure the response parser expects. Only the jurisdiction name, drug
//! information, additional context, and evidence vary per request.

/// Maximum output length for a classification completion
pub const CLASSIFICATION_MAX_TOKENS: u32 = 4000;

/// Classification decoding is deterministic
pub const CLASSIFICATION_TEMPERATURE: f32 = 0.0;

/// Each evidence block is clipped to this many characters before embedding
pub const MAX_EVIDENCE_BLOCK_CHARS: usize = 3000;

const SOURCE_SEPARATOR: &str = "\n\n---SOURCE---\n\n";

/// Build the classification prompt for one request
pub fn build_classification_prompt(
    jurisdiction: &str,
    drug_info: &str,
    additional_info: &str,
    evidence: &[String],
) -> String {
    let formatted_sources = format_sources(evidence, MAX_EVIDENCE_BLOCK_CHARS);

    format!(
        r#"You are a pharmaceutical regulatory expert specialized in {jurisdiction} drug regulations.

TASK:
Analyze the provided sources and determine if the drug described below is banned in {jurisdiction}.

DRUG INFORMATION:
{drug_info}

ADDITIONAL INFORMATION:
{additional_info}

SOURCE CONTENTS:
{formatted_sources}

DEFINITIONS:
- BANNED: The drug is completely illegal for all uses (medical, commercial, or otherwise) and cannot be legally manufactured, sold, prescribed, or possessed in {jurisdiction}.
- CONTROLLED DRUG (Not Banned): The drug is regulated, meaning it has restrictions on its usage/dosage but is not entirely prohibited.
- PRESCRIPTION-BASED DRUG: The drug is legal but only available with a valid prescription.
- OPEN FOR SALE (Not Banned): The drug is legally available for purchase without restrictions.

ANALYSIS INSTRUCTIONS:
1. Carefully review all provided source contents.
2. Look for explicit mentions of the drug being banned, prohibited, or withdrawn in {jurisdiction}.
3. Consider alternative names or formulations of the drug.
4. Note the recency and reliability of the information.
5. Identify if the drug appears on any official banned substance lists in {jurisdiction}.
6. If a drug is classified as illegal under acts like the NDPS Act or has strict penalties for possession, it must be classified as "BANNED".
7. If a drug is allowed for specific medical purposes under regulation, classify it as "CONTROLLED DRUG (Not Banned)".
8. Do not assume a drug is banned unless there is explicit evidence.

CLASSIFICATION DECISION:
Based on the evidence, provide:
1. Classification: "BANNED" or "CONTROLLED DRUG (Not Banned)" or "PRESCRIPTION-BASED DRUG (Not Banned)" or "OPEN FOR SALE (Not Banned)"
2. Confidence level: LOW, MEDIUM, or HIGH
3. Justification: Key evidence supporting your classification (cite specific sources)
4. Alternative status: If not banned, specify if it's restricted, prescription-only, or over-the-counter
5. Relevant regulations: Mention any specific {jurisdiction} regulatory acts or notifications.

INSTRUCTIONS:
1. Strictly use the specified classification categories only.
2. If a drug is declared completely illegal, classify it as "BANNED".
3. Only give the classification label in the classification fields, not the classification analysis.

OUTPUT STRUCTURE:
<output>
<classification> Banned or Not Banned </classification>
<detailed_classification> "BANNED" or "CONTROLLED DRUG (Not Banned)" or "PRESCRIPTION-BASED DRUG (Not Banned)" or "OPEN FOR SALE (Not Banned)" </detailed_classification>
<confidence_level> LOW, MEDIUM, or HIGH </confidence_level>
<justification> Key evidence supporting your classification (cite specific sources) </justification>
<alternative_status> If not banned, specify if it's restricted, prescription-only, or over-the-counter </alternative_status>
<relevant_regulations> Mention any specific regulatory acts or notifications. </relevant_regulations>
</output>"#
    )
}

/// Number and join evidence blocks, clipping each to the block limit
fn format_sources(evidence: &[String], max_chars: usize) -> String {
    evidence
        .iter()
        .filter(|block| !block.is_empty())
        .enumerate()
        .map(|(i, block)| format!("Source {}:\n{}", i + 1, truncate_block(block, max_chars)))
        .collect::<Vec<_>>()
        .join(SOURCE_SEPARATOR)
}

/// Clip a block to `max_chars` characters, backing up to a word boundary
fn truncate_block(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let clipped: String = text.chars().take(max_chars).collect();
    match clipped.rfind(' ') {
        Some(last_space) => format!("{}...", &clipped[..last_space]),
        None => format!("{}...", clipped),
    }
}
