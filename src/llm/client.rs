// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat completions client via OpenAI-compatible API

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use super::config::LlmConfig;

/// Errors from the LLM invocation boundary
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success response from the service
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message or response body
        message: String,
    },

    /// The service answered but produced no completion text
    #[error("Empty completion response from model {model}")]
    EmptyResponse {
        /// Model that produced the empty response
        model: String,
    },

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A base64-encoded image attached to a completion request
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Media type, e.g. "image/png"
    pub media_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl ImagePayload {
    /// Encode raw image bytes for transport
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self {
            media_type: media_type.to_string(),
            data: BASE64.encode(bytes),
        }
    }

    fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A single-turn completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The user message text
    pub prompt: String,
    /// Zero or more images attached to the message
    pub images: Vec<ImagePayload>,
    /// Maximum output length in tokens
    pub max_tokens: u32,
    /// Decoding temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Text-only request
    pub fn text(prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            max_tokens,
            temperature,
        }
    }
}

/// Invocation primitive shared by the classification and label-extraction
/// pipelines
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one single-turn completion and return the raw model text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Model identifier used for requests
    fn model_id(&self) -> &str;
}

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat completions service
pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl ChatCompletionClient {
    /// Create a new client from configuration
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        info!(
            "LLM client configured: endpoint={}, model={}",
            endpoint, config.model
        );

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
        })
    }

    fn build_content(request: &CompletionRequest) -> serde_json::Value {
        if request.images.is_empty() {
            return serde_json::json!(request.prompt);
        }

        let mut parts = vec![serde_json::json!({"type": "text", "text": request.prompt})];
        for image in &request.images {
            parts.push(serde_json::json!({
                "type": "image_url",
                "image_url": {"url": image.data_url()}
            }));
        }
        serde_json::Value::Array(parts)
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::build_content(request),
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            "Invoking {} (max_tokens={}, temperature={})",
            self.model, request.max_tokens, request.temperature
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;
        let text = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse {
                model: self.model.clone(),
            });
        }

        Ok(text)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
