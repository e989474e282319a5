use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use mflix_core::DomainError;
use mflix_infra::StoreError;

pub const MISSING_FIELDS: &str = "Bad Request. Missing required fields.";
pub const MISSING_IDS: &str = "Bad Request. Missing idMovie or idComment.";
pub const INVALID_ID: &str = "Bad Request. Invalid identifier.";
pub const INVALID_BODY: &str = "Bad Request. Invalid JSON body.";
pub const INVALID_UPDATE: &str = "Bad Request. Update body must be a non-empty JSON object.";
pub const IMMUTABLE_ID: &str = "Bad Request. _id cannot be updated.";
pub const UNSUPPORTED_VALUE: &str = "Bad Request. Update contains an unsupported value.";
pub const INTERNAL: &str = "Internal Server Error";

/// Handler failure, rendered as `{ "error": "..." }`.
///
/// Infrastructure details are logged, never sent to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingFields(fields) => {
                tracing::debug!(?fields, "rejected payload with missing fields");
                Self::bad_request(MISSING_FIELDS)
            }
            DomainError::InvalidId(msg) => {
                tracing::debug!(%msg, "rejected malformed identifier");
                Self::bad_request(INVALID_ID)
            }
            DomainError::UnsupportedValue(msg) => {
                tracing::debug!(%msg, "rejected update value");
                Self::bad_request(UNSUPPORTED_VALUE)
            }
            DomainError::Validation(msg) => Self::bad_request(format!("Bad Request. {msg}")),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => json_error(StatusCode::NOT_FOUND, msg),
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}
