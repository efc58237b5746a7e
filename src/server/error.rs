//! HTTP error envelope
//!
//! Every failing endpoint answers with `{error: {message, status, details?}}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::types::RefineError;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Map a crate error onto the envelope.
    ///
    /// Client errors keep their message. Server errors get a generic message,
    /// with the underlying error as `details` only when `diagnostics` is on.
    pub fn from_error(err: &RefineError, diagnostics: bool) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if err.is_client_error() {
            return Self::new(status, err.to_string());
        }

        error!("Request failed: {}", err);
        let api_error = Self::new(status, INTERNAL_MESSAGE);
        if diagnostics {
            api_error.with_details(err.to_string())
        } else {
            api_error
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                message: &self.message,
                status: self.status.as_u16(),
                details: self.details.as_deref(),
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_message() {
        let err = RefineError::UnsupportedFileType("Only source files are allowed".into());
        let api = ApiError::from_error(&err, false);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.message.starts_with("Invalid file type"));
        assert_eq!(api.details, None);
    }

    #[test]
    fn test_internal_details_need_diagnostics() {
        let err = RefineError::Config("broken".into());

        let hidden = ApiError::from_error(&err, false);
        assert_eq!(hidden.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hidden.message, INTERNAL_MESSAGE);
        assert_eq!(hidden.details, None);

        let shown = ApiError::from_error(&err, true);
        assert_eq!(shown.details.as_deref(), Some("Config error: broken"));
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let api = ApiError::from_error(&RefineError::RateLimited, false);
        assert_eq!(api.status, StatusCode::TOO_MANY_REQUESTS);
    }
}
