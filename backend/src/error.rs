//! Error handling for the Trade Analytics dataset server
//!
//! Every handler error, extractor rejections included, renders as
//! `{ "error": { "code", "message", "field" } }`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::CoreError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Core contract violations (unknown role/field, bad criteria)
    #[error(transparent)]
    Core(#[from] CoreError),

    // Dataset errors
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>, field: Option<&str>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: field.map(str::to_string),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", message.clone(), Some(field.as_str())),
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", msg.clone(), None),
            ),
            AppError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("INVALID_PAYLOAD", msg.clone(), None),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource), None),
            ),
            AppError::Core(err) => {
                let (code, field) = match err {
                    CoreError::UnknownRole(_) => ("UNKNOWN_ROLE", Some("role")),
                    CoreError::UnknownField(_) => ("UNKNOWN_FIELD", Some("field")),
                    CoreError::InvalidCriteria(_) => ("INVALID_CRITERIA", None),
                    CoreError::InvalidPayload(_) => ("INVALID_PAYLOAD", None),
                };
                (
                    StatusCode::BAD_REQUEST,
                    ErrorDetail::new(code, err.to_string(), field),
                )
            }
            AppError::DatasetUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new(
                    "DATASET_UNAVAILABLE",
                    format!("Dataset unavailable: {}", msg),
                    None,
                ),
            ),
            AppError::Csv(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("CSV_ERROR", self.to_string(), None),
            ),
            AppError::Io(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new("DATASET_IO_ERROR", "The dataset file could not be read", None),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone(), None),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred", None),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
