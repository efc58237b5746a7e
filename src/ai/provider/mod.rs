//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait for single-turn text completion.
//! Providers return the raw completion text plus the provider's own usage
//! statistics, which are passed through to callers untouched.

mod openai;

pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::types::Result;

/// Completion text with opaque usage statistics
#[derive(Debug, Clone)]
pub struct Completion {
    /// First choice's message content
    pub content: String,
    /// Provider `usage` object, or `Value::Null` when absent
    pub usage: Value,
}

/// Shared LLM provider type for concurrent access across request handlers.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

/// LLM Provider trait for single-turn completions
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one user prompt and return the first completion.
    ///
    /// Failures are reported as `RefineError::Provider` (with the HTTP status
    /// when the provider answered) or `RefineError::Timeout`.
    async fn complete(&self, prompt: &str) -> Result<Completion>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &LlmConfig) -> Result<SharedProvider> {
    Ok(Arc::new(OpenAiProvider::new(config.clone())?))
}
