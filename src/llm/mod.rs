// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! LLM invocation boundary
//!
//! One invocation primitive serves both prompt/response contracts in this
//! crate: the tagged classification output and the JSON label extraction.
//! The concrete client speaks the OpenAI-compatible chat completions API;
//! pipelines depend only on the `CompletionClient` trait so tests can script
//! responses.

pub mod client;
pub mod config;

pub use client::{ChatCompletionClient, CompletionClient, CompletionRequest, ImagePayload, LlmError};
pub use config::LlmConfig;
