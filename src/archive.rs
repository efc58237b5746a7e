//! Zip Archive Handling
//!
//! Extraction of uploaded archives into in-memory source entries, and
//! packaging of refactored sources into a downloadable archive with a
//! generated `README.md` manifest.

use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::constants::files::{MANIFEST_NAME, OUTPUT_PREFIX};
use crate::refactor::is_source_file;
use crate::types::{RefineError, Result};

/// A source file extracted from an uploaded archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFileEntry {
    /// Full path inside the archive; optional when echoed back by clients
    #[serde(default)]
    pub path: String,
    /// Final path component
    pub name: String,
    pub content: String,
}

/// A file destined for the output archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub content: String,
}

// =============================================================================
// Extraction
// =============================================================================

/// Extract accepted source files from zip bytes.
///
/// Directories, macOS resource forks and non-source files are skipped, as
/// are entries whose decompressed size exceeds `max_entry_bytes`. Content
/// is decoded as UTF-8, replacing invalid sequences.
pub fn extract_source_files(bytes: &[u8], max_entry_bytes: usize) -> Result<Vec<BatchFileEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| RefineError::invalid_input(format!("Invalid zip archive: {}", e)))?;

    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let file = archive
            .by_index(index)
            .map_err(|e| RefineError::invalid_input(format!("Invalid zip archive: {}", e)))?;

        let path = file.name().to_string();
        if file.is_dir() || is_resource_fork(&path) || !is_source_file(&path) {
            debug!("Skipping archive entry: {}", path);
            continue;
        }

        let mut buf = Vec::new();
        file.take(max_entry_bytes as u64 + 1)
            .read_to_end(&mut buf)
            .map_err(|e| RefineError::invalid_input(format!("Failed to read {}: {}", path, e)))?;
        if buf.len() > max_entry_bytes {
            warn!("Skipping oversized archive entry: {}", path);
            continue;
        }

        entries.push(BatchFileEntry {
            name: base_name(&path),
            content: String::from_utf8_lossy(&buf).into_owned(),
            path,
        });
    }

    Ok(entries)
}

fn is_resource_fork(path: &str) -> bool {
    path.starts_with("__MACOSX/") || base_name(path).starts_with("._")
}

/// Final component of a `/`-separated path, never empty
fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("file")
        .to_string()
}

// =============================================================================
// Packaging
// =============================================================================

/// Build the output archive: every file under `src/`, plus `README.md`.
pub fn build_refactored_archive(files: &[OutputFile]) -> Result<Vec<u8>> {
    build_archive_at(files, Utc::now())
}

fn build_archive_at(files: &[OutputFile], generated_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    let paths = output_paths(files);
    for (path, file) in paths.iter().zip(files) {
        writer.start_file(path.as_str(), options)?;
        writer.write_all(file.content.as_bytes())?;
    }

    let manifest = render_manifest(&paths, files, generated_at);
    writer.start_file(MANIFEST_NAME, options)?;
    writer.write_all(manifest.as_bytes())?;

    Ok(writer.finish()?.into_inner())
}

/// `src/<name>` per file; a repeated name gets the first free `-N` suffix
fn output_paths(files: &[OutputFile]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();

    files
        .iter()
        .map(|file| {
            let name = base_name(&file.name);
            let mut unique = name.clone();
            let mut n = 1;
            while taken.contains(&unique) {
                n += 1;
                unique = with_suffix(&name, n);
            }
            taken.insert(unique.clone());
            format!("{}{}", OUTPUT_PREFIX, unique)
        })
        .collect()
}

fn with_suffix(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, n, ext),
        _ => format!("{}-{}", name, n),
    }
}

fn render_manifest(paths: &[String], files: &[OutputFile], generated_at: DateTime<Utc>) -> String {
    let mut manifest = String::from("# Refactored Code\n\n");
    manifest.push_str(&format!(
        "Generated on {}.\n\n## Files\n\n",
        generated_at.to_rfc3339()
    ));

    for (path, file) in paths.iter().zip(files) {
        manifest.push_str(&format!(
            "- `{}` ({} characters)\n",
            path,
            file.content.chars().count()
        ));
    }

    manifest.push_str(&format!("\nTotal files: {}\n", files.len()));
    manifest
}
