use axum::{routing::get, Router};

pub mod comments;
pub mod docs;
pub mod movies;
pub mod system;

/// Router for every resource endpoint, mounted under `/api`.
pub fn router() -> Router {
    Router::new()
        .route(
            "/doc",
            get(docs::openapi).fallback(system::method_not_allowed),
        )
        .merge(movies::router())
        .merge(comments::router())
}
