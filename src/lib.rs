//! coderefine - LLM-Backed Code Refactoring Service
//!
//! An HTTP backend that sends JavaScript/TypeScript sources to an
//! OpenAI-compatible chat-completion API, cleans up the reply, and reports
//! heuristic metrics about the rewrite.
//!
//! ## Core Features
//!
//! - **Snippets and uploads**: raw code, single files, or zip archives
//! - **Batch refactoring**: zip download or per-file JSON results
//! - **Heuristic scoring**: line counts and a bounded quality score
//!
//! ## Quick Start
//!
//! ```ignore
//! use coderefine::{AppState, ConfigLoader, build_router, create_provider};
//!
//! let config = ConfigLoader::resolve(None)?;
//! let provider = create_provider(&config.llm)?;
//! let app = build_router(AppState::new(config, provider));
//! ```
//!
//! ## Modules
//!
//! - [`refactor`]: prompt construction, provider call, metrics
//! - [`ai`]: provider abstraction, prompt builder, fence cleanup
//! - [`archive`]: zip extraction and output packaging
//! - [`batch`]: sequential per-file batch pipelines
//! - [`server`]: axum routes and middleware
//! - [`config`]: figment-backed configuration

pub mod ai;
pub mod archive;
pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod refactor;
pub mod server;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use ai::{Completion, LlmProvider, OpenAiProvider, SharedProvider, create_provider};
pub use config::{Config, ConfigLoader};
pub use refactor::{Language, Metrics, RefactorResult, RefactorService, RefactorSettings};
pub use server::{AppState, build_router};
pub use types::{ErrorCode, RefineError, Result};
