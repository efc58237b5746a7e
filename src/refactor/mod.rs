//! Refactor Service
//!
//! Turns one source snippet into a refactored snippet plus heuristic metrics:
//!
//! 1. Build a prompt from the language table, fixed directives and settings
//! 2. Send it to the completion provider (single attempt, bounded timeout)
//! 3. Strip markdown fencing from the reply
//! 4. Compute line-count metrics and the heuristic quality score

pub mod language;
pub mod metrics;
pub mod prompt;
pub mod service;

pub use language::{
    Language, detect_batch_language, detect_upload_language, file_extension, is_source_file,
};
pub use metrics::Metrics;
pub use prompt::{RefactorSettings, build_refactor_prompt};
pub use service::{RefactorFailure, RefactorOutput, RefactorResult, RefactorService};
