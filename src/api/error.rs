/// API error type with HTTP status mapping
///
/// Errors are converted to `{ "error": code, "message": text }` JSON bodies.

use crate::project::types::ValidationError;
use crate::store::error::{StorageError, StorageErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Request body failed validation (400)
    Validation(ValidationError),
    /// Anything the project store reported
    Storage(StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
            Self::Storage(e) => match e.kind() {
                StorageErrorKind::NotFound => {
                    (StatusCode::NOT_FOUND, e.kind().as_str(), e.message().to_string())
                }
                StorageErrorKind::InsertionFailed => {
                    tracing::error!("Insertion failed: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        e.kind().as_str(),
                        "the project could not be saved".to_string(),
                    )
                }
                _ => {
                    // Log the actual error, return generic message
                    tracing::error!("Storage error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "an internal error occurred".to_string(),
                    )
                }
            },
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
