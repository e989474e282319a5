use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use bson::doc;
use serde_json::Value;

use mflix_core::{MovieDraft, MovieId};
use mflix_infra::{collections, mapping, DEFAULT_FIND_LIMIT};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::routes::system::method_not_allowed;
use crate::app::services::AppServices;

const NOT_FOUND: &str = "Movie not found";

pub fn router() -> Router {
    Router::new()
        .route(
            "/movies",
            get(list_movies).post(create_movie).fallback(method_not_allowed),
        )
        .route(
            "/movie/:id_movie",
            get(get_movie)
                .put(update_movie)
                .delete(delete_movie)
                .fallback(method_not_allowed),
        )
}

/// First page of movies, unfiltered.
#[utoipa::path(
    get,
    path = "/api/movies",
    tag = "Movies",
    responses(
        (status = 200, description = "First 10 movies"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list_movies(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let movies = services
        .store()
        .find_many(collections::MOVIES, doc! {}, Some(DEFAULT_FIND_LIMIT))
        .await?;
    Ok(dto::data(StatusCode::OK, dto::documents_to_json(&movies)))
}

#[utoipa::path(
    post,
    path = "/api/movies",
    tag = "Movies",
    request_body = MovieDraft,
    responses(
        (status = 201, description = "Movie added successfully"),
        (status = 400, description = "Bad Request. Missing required fields."),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_movie(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<MovieDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let movie = dto::parse_body(body)?.into_movie()?;

    let document = mapping::movie_document(movie);
    let inserted = services
        .store()
        .insert_one(collections::MOVIES, document.clone())
        .await?;
    tracing::info!(movie_id = %inserted.id, "movie added");

    let stored = mapping::with_id(inserted.id, document);
    Ok(dto::data_with_message(
        StatusCode::CREATED,
        dto::document_to_json(&stored),
        "Movie added successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/api/movie/{idMovie}",
    tag = "Movies",
    params(("idMovie" = String, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "Successful operation"),
        (status = 400, description = "Bad Request. Invalid identifier."),
        (status = 404, description = "Movie not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn get_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id_movie): Path<String>,
) -> Result<Response, ApiError> {
    let id: MovieId = dto::parse_id(&id_movie)?;

    let movie = services
        .store()
        .find_one(collections::MOVIES, collections::movie_by_id(id))
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(dto::data(StatusCode::OK, dto::document_to_json(&movie)))
}

/// Field-level merge of the body into an existing movie. No required-field
/// re-validation happens here.
#[utoipa::path(
    put,
    path = "/api/movie/{idMovie}",
    tag = "Movies",
    params(("idMovie" = String, Path, description = "Movie identifier")),
    request_body(content = Object, description = "Fields to merge into the movie"),
    responses(
        (status = 200, description = "Movie updated successfully"),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Movie not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn update_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id_movie): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id: MovieId = dto::parse_id(&id_movie)?;
    let patch = mapping::movie_patch(dto::parse_update(body)?)?;
    let store = services.store();

    if store
        .find_one(collections::MOVIES, collections::movie_by_id(id))
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    let outcome = store
        .update_one(collections::MOVIES, collections::movie_by_id(id), patch)
        .await?;
    // Deleted between the lookup and the update.
    if !outcome.matched() {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    tracing::info!(movie_id = %id, modified = outcome.modified_count, "movie updated");
    Ok(dto::message(StatusCode::OK, "Movie updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/movie/{idMovie}",
    tag = "Movies",
    params(("idMovie" = String, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "Movie deleted successfully"),
        (status = 400, description = "Bad Request. Invalid identifier."),
        (status = 404, description = "Movie not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn delete_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id_movie): Path<String>,
) -> Result<Response, ApiError> {
    let id: MovieId = dto::parse_id(&id_movie)?;

    let outcome = services
        .store()
        .delete_one(collections::MOVIES, collections::movie_by_id(id))
        .await?;

    match outcome.deleted_count {
        0 => Err(ApiError::NotFound(NOT_FOUND)),
        1 => {
            tracing::info!(movie_id = %id, "movie deleted");
            Ok(dto::message(StatusCode::OK, "Movie deleted successfully"))
        }
        n => Err(ApiError::Internal(format!("delete_one removed {n} movies"))),
    }
}
