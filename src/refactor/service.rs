//! Refactor Service
//!
//! prompt → provider → fence cleanup → metrics. Every failure resolves to a
//! [`RefactorResult::Failed`]; nothing propagates past `refactor`.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::language::Language;
use super::metrics::Metrics;
use super::prompt::{RefactorSettings, build_refactor_prompt};
use crate::ai::{SharedProvider, strip_code_fences};
use crate::types::{ErrorCode, RefineError};

/// Successful refactor payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactorOutput {
    pub refactored_code: String,
    pub metrics: Metrics,
    /// Provider usage statistics, passed through as-is
    pub token_usage: Value,
}

/// Failed refactor payload
#[derive(Debug, Clone, Serialize)]
pub struct RefactorFailure {
    pub message: String,
    pub code: ErrorCode,
}

impl RefactorFailure {
    fn from_error(err: &RefineError) -> Self {
        let message = err.to_string();
        Self {
            message: if message.trim().is_empty() {
                "Unknown provider error".to_string()
            } else {
                message
            },
            code: err.error_code(),
        }
    }
}

/// Outcome of one refactor call
#[derive(Debug, Clone)]
pub enum RefactorResult {
    Refactored(RefactorOutput),
    Failed(RefactorFailure),
}

/// Builds prompts, calls the provider, and scores the result
#[derive(Clone)]
pub struct RefactorService {
    provider: SharedProvider,
}

impl RefactorService {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    pub async fn refactor(
        &self,
        code: &str,
        language: Language,
        settings: &RefactorSettings,
    ) -> RefactorResult {
        let prompt = build_refactor_prompt(code, language, settings);
        info!(
            language = %language,
            model = self.provider.model(),
            code_lines = code.lines().count(),
            "Refactoring code"
        );

        match self.provider.complete(&prompt).await {
            Ok(completion) => {
                let refactored_code = strip_code_fences(&completion.content);
                let metrics = Metrics::compute(code, &refactored_code);
                RefactorResult::Refactored(RefactorOutput {
                    refactored_code,
                    metrics,
                    token_usage: completion.usage,
                })
            }
            Err(err) => {
                let failure = RefactorFailure::from_error(&err);
                warn!(code = %failure.code, "Refactor failed: {}", failure.message);
                RefactorResult::Failed(failure)
            }
        }
    }
}
