//! Error types and their JSON responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use files_core::{CoreError, FieldViolation};
use files_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Body detail of every 404 for a missing file
pub const FILE_NOT_FOUND: &str = "File not found";
/// Body detail of every 500
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// API error type.
///
/// Handler panics never reach this type; `CatchPanicLayer` answers them with
/// the same generic 500 body.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request input failed validation
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldViolation>),

    /// Object not found
    #[error("not found: {0}")]
    NotFound(String),

    /// The request could not be read (body too large, broken multipart, ...)
    #[error("rejected request: {status} {detail}")]
    Rejected { status: StatusCode, detail: String },

    /// The object store failed
    #[error("upstream store error: {0}")]
    Upstream(#[source] StoreError),
}

impl ApiError {
    /// Single-violation validation failure
    pub fn invalid(violation: FieldViolation) -> Self {
        Self::Validation(vec![violation])
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected { status, .. } => *status,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidQuery(violations) => Self::Validation(violations),
            CoreError::NotFound(key) => Self::NotFound(key),
            CoreError::Upstream(source) => Self::Upstream(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            Self::Validation(violations) => json!({ "detail": violations }),
            Self::NotFound(_) => json!({ "detail": FILE_NOT_FOUND }),
            Self::Rejected { detail, .. } => json!({ "detail": detail }),
            Self::Upstream(source) => {
                tracing::error!(error = %source, "Object store call failed");
                json!({ "detail": INTERNAL_SERVER_ERROR })
            }
        };

        (status, Json(body)).into_response()
    }
}
