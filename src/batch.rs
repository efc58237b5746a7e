//! Batch Refactoring
//!
//! Two per-file pipelines over the same sequential loop:
//!
//! - **Archive**: failures fall back silently to the original content; the
//!   result is packaged into a zip by the caller.
//! - **Animated**: failures keep the original content *and* report the
//!   error per entry so a client can render them.
//!
//! Files are refactored one at a time; batch latency grows linearly with
//! the number of files.

use serde::Serialize;
use tracing::{debug, info};

use crate::archive::{BatchFileEntry, OutputFile};
use crate::refactor::{RefactorResult, RefactorService, RefactorSettings, detect_batch_language};

/// Per-file result of the animated batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResultEntry {
    pub name: String,
    pub refactored_code: String,
    pub error: Option<String>,
}

impl BatchResultEntry {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Refactor every file, keeping the original content on failure.
pub async fn refactor_for_archive(
    service: &RefactorService,
    files: &[BatchFileEntry],
    settings: &RefactorSettings,
) -> Vec<OutputFile> {
    let mut output = Vec::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        let language = detect_batch_language(&file.name);
        debug!(file = %file.name, %language, "Batch file {}/{}", index + 1, files.len());

        let content = match service.refactor(&file.content, language, settings).await {
            RefactorResult::Refactored(out) => out.refactored_code,
            RefactorResult::Failed(_) => file.content.clone(),
        };

        output.push(OutputFile {
            name: file.name.clone(),
            content,
        });
    }

    info!("Archive batch finished: {} files", output.len());
    output
}

/// Refactor every file, recording per-file errors alongside the original content.
pub async fn refactor_with_report(
    service: &RefactorService,
    files: &[BatchFileEntry],
    settings: &RefactorSettings,
) -> Vec<BatchResultEntry> {
    let mut entries = Vec::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        let language = detect_batch_language(&file.name);
        debug!(file = %file.name, %language, "Batch file {}/{}", index + 1, files.len());

        let entry = match service.refactor(&file.content, language, settings).await {
            RefactorResult::Refactored(out) => BatchResultEntry {
                name: file.name.clone(),
                refactored_code: out.refactored_code,
                error: None,
            },
            RefactorResult::Failed(failure) => BatchResultEntry {
                name: file.name.clone(),
                refactored_code: file.content.clone(),
                error: Some(failure.message),
            },
        };
        entries.push(entry);
    }

    let failed = entries.iter().filter(|e| e.is_failed()).count();
    info!(
        "Reported batch finished: {} files, {} failed",
        entries.len(),
        failed
    );
    entries
}

/// When every entry failed, the joined error messages; otherwise `None`.
pub fn total_failure_details(entries: &[BatchResultEntry]) -> Option<String> {
    if entries.is_empty() || !entries.iter().all(BatchResultEntry::is_failed) {
        return None;
    }

    Some(
        entries
            .iter()
            .filter_map(|e| e.error.as_deref())
            .collect::<Vec<_>>()
            .join("; "),
    )
}
