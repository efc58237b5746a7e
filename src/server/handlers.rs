//! Route handlers
//!
//! Single snippets and single-file uploads share [`run_refactor`]; the two
//! batch endpoints share the per-file loop in [`crate::batch`] but differ in
//! how per-file failures surface.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::error::ApiError;
use super::state::AppState;
use super::upload::{decode_text, read_file_field, validate_archive, validate_source};
use crate::archive::{BatchFileEntry, build_refactored_archive, extract_source_files};
use crate::batch::{refactor_for_archive, refactor_with_report, total_failure_details};
use crate::constants::files::ARCHIVE_FILE_NAME;
use crate::refactor::{
    Language, RefactorOutput, RefactorResult, RefactorSettings, detect_upload_language,
};

type HandlerResult = std::result::Result<Response, ApiError>;

// =============================================================================
// Request / Response Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RefactorRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub settings: RefactorSettings,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub files: Vec<BatchFileEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefactorData {
    #[serde(flatten)]
    output: RefactorOutput,
    language: Language,
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> std::result::Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))
}

// =============================================================================
// Single Snippet / Single File
// =============================================================================

/// Refactor one snippet and wrap the outcome in the response envelope.
///
/// Shared by `POST /api/refactor` and `POST /api/refactor/upload`.
pub async fn run_refactor(
    state: &AppState,
    code: &str,
    language: Language,
    settings: &RefactorSettings,
) -> HandlerResult {
    match state.service.refactor(code, language, settings).await {
        RefactorResult::Refactored(output) => Ok(Json(json!({
            "success": true,
            "data": RefactorData { output, language },
        }))
        .into_response()),
        RefactorResult::Failed(failure) => {
            Err(ApiError::internal("Failed to refactor code").with_details(failure.message))
        }
    }
}

/// `POST /api/refactor`
pub async fn refactor_code(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RefactorRequest>, JsonRejection>,
) -> HandlerResult {
    let request = json_body(payload)?;

    let (Some(code), Some(language)) = (
        request.code.filter(|c| !c.trim().is_empty()),
        request.language.filter(|l| !l.trim().is_empty()),
    ) else {
        return Err(ApiError::bad_request("Code and language are required"));
    };

    run_refactor(&state, &code, Language::from_tag(&language), &request.settings).await
}

/// `POST /api/refactor/upload`
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> HandlerResult {
    let file = read_file_field(multipart).await?;
    validate_source(&file, state.config.limits.max_file_bytes).map_err(|e| state.error(e))?;

    let code = decode_text(&file).map_err(|e| state.error(e))?;
    if code.trim().is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    let language = detect_upload_language(&file.name);
    info!(file = %file.name, %language, bytes = file.len(), "File uploaded");

    run_refactor(&state, &code, language, &RefactorSettings::default()).await
}

// =============================================================================
// Archives
// =============================================================================

/// `POST /api/refactor/upload-zip`: extraction preview only
pub async fn upload_zip(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> HandlerResult {
    let file = read_file_field(multipart).await?;
    let limits = &state.config.limits;
    validate_archive(&file, limits.max_archive_bytes).map_err(|e| state.error(e))?;

    let files = extract_source_files(&file.bytes, limits.max_file_bytes)
        .map_err(|e| state.error(e))?;
    if files.is_empty() {
        return Err(ApiError::bad_request(
            "No supported source files found in archive",
        ));
    }

    info!(archive = %file.name, files = files.len(), "Archive extracted");
    Ok(Json(json!({ "success": true, "files": files })).into_response())
}

/// `POST /api/refactor/refactor-zip`: refactor and return a new archive
pub async fn refactor_zip(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BatchRequest>, JsonRejection>,
) -> HandlerResult {
    let request = json_body(payload)?;
    if request.files.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }

    let output =
        refactor_for_archive(&state.service, &request.files, &RefactorSettings::default()).await;
    let archive = build_refactored_archive(&output).map_err(|e| state.error(e))?;

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME),
        ),
    ];
    Ok((headers, archive).into_response())
}

/// `POST /api/refactor/refactor-zip-animated`: per-file JSON results
pub async fn refactor_zip_animated(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BatchRequest>, JsonRejection>,
) -> HandlerResult {
    let request = json_body(payload)?;
    if request.files.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }

    let entries =
        refactor_with_report(&state.service, &request.files, &RefactorSettings::default()).await;

    if let Some(details) = total_failure_details(&entries) {
        return Err(ApiError::internal("Failed to refactor any files").with_details(details));
    }

    Ok(Json(json!({ "success": true, "files": entries })).into_response())
}

// =============================================================================
// Informational
// =============================================================================

/// `GET /api/refactor/stats`: constant placeholder, no analytics behind it
pub async fn stats() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "data": {
            "stats": {
                "totalRefactors": 0,
                "linesProcessed": 0,
                "averageQualityScore": null,
            },
            "placeholder": true,
        },
    }))
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let provider = state.service.provider();
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION"),
        "provider": {
            "name": provider.name(),
            "model": provider.model(),
        },
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
