//! AI Integration Layer
//!
//! Provider abstraction, prompt construction and completion cleanup.

pub mod cleanup;
pub mod prompt;
pub mod provider;

pub use cleanup::strip_code_fences;
pub use prompt::{PromptBuilder, PromptSection};
pub use provider::{Completion, LlmProvider, OpenAiProvider, SharedProvider, create_provider};
