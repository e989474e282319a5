//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: which document store backs the handlers
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request parsing and response envelopes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    http::{HeaderName, Method},
    routing::get,
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, Backend, StartupError};

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: AppServices) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("x-request-id")]);

    Router::new()
        .route(
            "/health",
            get(routes::system::health).fallback(routes::system::method_not_allowed),
        )
        .nest("/api", routes::router())
        .fallback(routes::system::not_found)
        .layer(Extension(Arc::new(services)))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
