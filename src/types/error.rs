//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Classes
//!
//! - **Client input**: missing fields, disallowed file types, oversized uploads (4xx)
//! - **Provider**: non-success responses or transport failures from the completion API
//! - **Internal**: I/O, archive and configuration failures (5xx)
//!
//! Provider errors never escape the refactor service; they are folded into a
//! failed `RefactorResult` carrying an [`ErrorCode`].

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Error Codes
// =============================================================================

/// Code attached to a failed refactor.
///
/// Prefers the provider's HTTP status; falls back to a sentinel string when
/// the failure never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Status(u16),
    Sentinel(&'static str),
}

impl ErrorCode {
    pub const UNKNOWN: ErrorCode = ErrorCode::Sentinel("UNKNOWN_ERROR");
    pub const TIMEOUT: ErrorCode = ErrorCode::Sentinel("ETIMEDOUT");
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{}", status),
            Self::Sentinel(code) => write!(f, "{}", code),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum RefineError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Provider Errors
    // -------------------------------------------------------------------------
    /// Completion API failure; `status` is set when the provider answered
    #[error("{message}")]
    Provider {
        message: String,
        status: Option<u16>,
    },

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Client Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid file type. {0}")]
    UnsupportedFileType(String),

    #[error("File too large. Maximum size is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Too many requests, please try again later")]
    RateLimited,
}

pub type Result<T> = std::result::Result<T, RefineError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl RefineError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a provider error
    pub fn provider(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Provider {
            message: message.into(),
            status,
        }
    }

    /// Create a client input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// HTTP status this error maps to at the API boundary
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::UnsupportedFileType(_) => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::RateLimited => 429,
            _ => 500,
        }
    }

    /// Whether the error was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Code reported in a failed refactor result
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Provider {
                status: Some(status),
                ..
            } => ErrorCode::Status(*status),
            Self::Timeout { .. } => ErrorCode::TIMEOUT,
            _ => ErrorCode::UNKNOWN,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
