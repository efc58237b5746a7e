//! OpenAI-compatible Chat Completions Provider
//!
//! Sends a single user message with fixed generation parameters and returns
//! the first choice's text together with the provider's `usage` object.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{Completion, LlmProvider};
use crate::config::LlmConfig;
use crate::types::{RefineError, Result};

/// OpenAI-compatible provider with secure API key handling
pub struct OpenAiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let api_key = config.api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
            RefineError::Config(
                "API key not found. Set OPENAI_API_KEY or CODEREFINE_LLM__API_KEY".to_string(),
            )
        })?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RefineError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout,
            client,
        })
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> RefineError {
        if err.is_timeout() {
            RefineError::timeout("chat completion request", self.timeout)
        } else {
            RefineError::provider(err.to_string(), err.status().map(|s| s.as_u16()))
        }
    }
}

/// Prefer the provider's `error.message`; fall back to a status line.
fn provider_error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {}", status))
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<Completion> {
        info!(
            "Requesting completion (model: {}, temperature: {}, prompt_chars: {})",
            self.model,
            self.temperature,
            prompt.len()
        );

        let start_time = Instant::now();
        let request = self.build_request(prompt);
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = provider_error_message(&body, status.as_u16());
            warn!("Provider returned {}: {}", status, message);
            return Err(RefineError::provider(message, Some(status.as_u16())));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        debug!(
            "Completion received in {}ms",
            start_time.elapsed().as_millis()
        );

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RefineError::provider("No content in provider response", None))?;

        Ok(Completion {
            content,
            usage: body.usage.unwrap_or(Value::Null),
        })
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
