use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bson::Document;
use serde_json::{json, Map, Value};

use mflix_core::DomainError;
use mflix_infra::mapping;

use crate::app::errors::{self, ApiError};

// -------------------------
// Request parsing
// -------------------------

/// Unwrap a JSON body, turning any rejection (syntax, type mismatch, missing
/// content type) into a 400.
pub fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "rejected request body");
            Err(ApiError::bad_request(errors::INVALID_BODY))
        }
    }
}

/// Fields of an update body: a non-empty JSON object that does not touch `_id`.
pub fn parse_update(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, ApiError> {
    match parse_body(body)? {
        Value::Object(fields) if fields.contains_key("_id") => {
            Err(ApiError::bad_request(errors::IMMUTABLE_ID))
        }
        Value::Object(fields) if !fields.is_empty() => Ok(fields),
        _ => Err(ApiError::bad_request(errors::INVALID_UPDATE)),
    }
}

/// Parse a path identifier.
pub fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    if raw.trim().is_empty() {
        return Err(ApiError::bad_request(errors::MISSING_IDS));
    }
    Ok(raw.parse::<T>()?)
}

// -------------------------
// Response envelopes
// -------------------------

pub fn data(status: StatusCode, data: Value) -> Response {
    (status, Json(json!({ "status": status.as_u16(), "data": data }))).into_response()
}

pub fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": status.as_u16(), "message": message }))).into_response()
}

pub fn data_with_message(status: StatusCode, data: Value, message: &str) -> Response {
    (
        status,
        Json(json!({ "status": status.as_u16(), "data": data, "message": message })),
    )
        .into_response()
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn document_to_json(document: &Document) -> Value {
    mapping::document_to_json(document)
}

pub fn documents_to_json(documents: &[Document]) -> Value {
    Value::Array(documents.iter().map(mapping::document_to_json).collect())
}
