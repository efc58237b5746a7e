//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Resolved once at startup and passed explicitly to the server and provider.

use serde::{Deserialize, Serialize};

use crate::constants::{limits, network, server};
use crate::types::{RefineError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server posture
    pub server: ServerConfig,

    /// Completion provider settings
    pub llm: LlmConfig,

    /// Upload size limits
    pub limits: LimitsConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `RefineError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(RefineError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(RefineError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(RefineError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        url::Url::parse(&self.llm.api_base).map_err(|e| {
            RefineError::Config(format!("Invalid LLM api_base '{}': {}", self.llm.api_base, e))
        })?;

        if self.server.port == 0 {
            return Err(RefineError::Config(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.server.rate_limit_per_minute == 0 {
            return Err(RefineError::Config(
                "Server rate_limit_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.server.body_limit_bytes == 0
            || self.limits.max_file_bytes == 0
            || self.limits.max_archive_bytes == 0
        {
            return Err(RefineError::Config(
                "Size limits must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Origins allowed by CORS; `*` allows any origin
    pub allowed_origins: Vec<String>,

    /// Maximum JSON request body size
    pub body_limit_bytes: usize,

    /// Requests allowed per client IP per minute
    pub rate_limit_per_minute: u32,

    /// Expose internal error details in 5xx responses
    pub diagnostics: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: server::DEFAULT_HOST.to_string(),
            port: server::DEFAULT_PORT,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            body_limit_bytes: limits::DEFAULT_BODY_LIMIT_BYTES,
            rate_limit_per_minute: server::DEFAULT_RATE_LIMIT_PER_MINUTE,
            diagnostics: false,
        }
    }
}

impl ServerConfig {
    /// Socket address string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Completion provider configuration
///
/// Note: the API key is never serialized to output and is redacted in debug
/// output. The provider converts it to `SecretString` internally.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    pub api_base: String,

    /// Model name
    pub model: String,

    /// Bearer credential
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for generation (low for near-deterministic rewrites)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: network::DEFAULT_API_BASE.to_string(),
            model: network::DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: network::DEFAULT_TEMPERATURE,
            max_tokens: network::DEFAULT_MAX_TOKENS,
        }
    }
}

// =============================================================================
// Limits Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum single source upload size
    pub max_file_bytes: usize,

    /// Maximum zip archive upload size
    pub max_archive_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: limits::MAX_FILE_BYTES,
            max_archive_bytes: limits::MAX_ARCHIVE_BYTES,
        }
    }
}
