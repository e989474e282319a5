use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app::errors::json_error;
use crate::app::services::AppServices;

/// Liveness plus a round trip to the store.
pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.store().ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed(method: Method) -> (StatusCode, String) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {method} Not Allowed"),
    )
}

pub async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not Found")
}
