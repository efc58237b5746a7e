//! Multipart upload intake
//!
//! Reads the single `file` field and validates it against the source or
//! archive allow-lists. A file passes when either its extension or its
//! declared MIME type is allowed.

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::{MultipartError, MultipartRejection};

use super::error::ApiError;
use crate::constants::files::{ARCHIVE_MIME_TYPES, SOURCE_MIME_TYPES};
use crate::refactor::{file_extension, is_source_file};
use crate::types::{RefineError, Result};

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

/// An uploaded file held in memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME essence, lowercased and without parameters
    fn mime(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    fn mime_in(&self, allowed: &[&str]) -> bool {
        self.mime().is_some_and(|m| allowed.contains(&m.as_str()))
    }
}

/// Read the `file` field; 400 when the request carries none.
pub async fn read_file_field(
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<UploadedFile, ApiError> {
    let mut multipart =
        multipart.map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadedFile {
            name,
            content_type,
            bytes,
        });
    }

    Err(ApiError::bad_request("No file uploaded"))
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

/// Accept a JavaScript/TypeScript/JSON source up to `max_bytes`
pub fn validate_source(file: &UploadedFile, max_bytes: usize) -> Result<()> {
    check_size(file, max_bytes)?;

    if is_source_file(&file.name) || file.mime_in(SOURCE_MIME_TYPES) {
        Ok(())
    } else {
        Err(RefineError::UnsupportedFileType(
            "Only .js, .jsx, .ts, .tsx and .json files are allowed".to_string(),
        ))
    }
}

/// Accept a zip archive up to `max_bytes`
pub fn validate_archive(file: &UploadedFile, max_bytes: usize) -> Result<()> {
    check_size(file, max_bytes)?;

    let zip_extension = file_extension(&file.name).is_some_and(|ext| ext == "zip");
    if zip_extension || file.mime_in(ARCHIVE_MIME_TYPES) {
        Ok(())
    } else {
        Err(RefineError::UnsupportedFileType(
            "Only .zip archives are allowed".to_string(),
        ))
    }
}

fn check_size(file: &UploadedFile, max_bytes: usize) -> Result<()> {
    if file.len() > max_bytes {
        return Err(RefineError::PayloadTooLarge { limit: max_bytes });
    }
    Ok(())
}

/// Decode upload content as UTF-8 text
pub fn decode_text(file: &UploadedFile) -> Result<String> {
    String::from_utf8(file.bytes.to_vec())
        .map_err(|_| RefineError::invalid_input("File content must be valid UTF-8 text"))
}
