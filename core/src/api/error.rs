//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::ShipError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Claim pending: {0}")]
    ClaimPending(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// Body could not be decoded into the expected shape.
    #[error("Malformed body: {0}")]
    Malformed(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::ClaimPending(detail) => (StatusCode::NOT_FOUND, "CLAIM_PENDING", detail),
            ApiError::Validation(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                detail,
            ),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "ALREADY_RECONCILED", detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::Malformed(detail) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_BODY", detail)
            }
            ApiError::Internal(detail) => {
                log::error!("API internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ShipError> for ApiError {
    fn from(err: ShipError) -> Self {
        match err {
            ShipError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ShipError::ClaimPending { .. } => ApiError::ClaimPending(err.to_string()),
            ShipError::Validation(msg) => ApiError::Validation(msg),
            ShipError::AlreadyReconciled { .. } => ApiError::Conflict(err.to_string()),
            ShipError::Database(_) | ShipError::Serialization(_) | ShipError::Other(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

/// Every body rejection (syntax, data, missing content type) is a 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
