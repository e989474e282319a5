use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use mflix_core::{CommentDraft, CommentId, MovieId};
use mflix_infra::{collections, mapping};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::routes::system::method_not_allowed;
use crate::app::services::AppServices;

const NOT_FOUND: &str = "Comment not found";

pub fn router() -> Router {
    Router::new()
        .route(
            "/movie/:id_movie/comments",
            get(list_comments)
                .post(create_comment)
                .fallback(method_not_allowed),
        )
        .route(
            "/movie/:id_movie/comments/:id_comment",
            get(get_comment)
                .put(update_comment)
                .delete(delete_comment)
                .fallback(method_not_allowed),
        )
}

fn parse_ids(id_movie: &str, id_comment: &str) -> Result<(MovieId, CommentId), ApiError> {
    Ok((dto::parse_id(id_movie)?, dto::parse_id(id_comment)?))
}

/// Every comment attached to a movie. The movie itself is not looked up.
#[utoipa::path(
    get,
    path = "/api/movie/{idMovie}/comments",
    tag = "Comments",
    params(("idMovie" = String, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "Comments of the movie"),
        (status = 400, description = "Bad Request. Invalid identifier."),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list_comments(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id_movie): Path<String>,
) -> Result<Response, ApiError> {
    let movie_id: MovieId = dto::parse_id(&id_movie)?;

    let comments = services
        .store()
        .find_many(collections::COMMENTS, collections::comments_of(movie_id), None)
        .await?;
    Ok(dto::data(StatusCode::OK, dto::documents_to_json(&comments)))
}

#[utoipa::path(
    post,
    path = "/api/movie/{idMovie}/comments",
    tag = "Comments",
    params(("idMovie" = String, Path, description = "Movie identifier")),
    request_body = CommentDraft,
    responses(
        (status = 200, description = "Comment added successfully"),
        (status = 400, description = "Bad Request. Missing required fields."),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id_movie): Path<String>,
    body: Result<Json<CommentDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let movie_id: MovieId = dto::parse_id(&id_movie)?;
    let comment = dto::parse_body(body)?.into_comment()?;
    comment.ensure_belongs_to(movie_id)?;

    let document = mapping::comment_document(comment);
    let inserted = services
        .store()
        .insert_one(collections::COMMENTS, document.clone())
        .await?;
    tracing::info!(%movie_id, comment_id = %inserted.id, "comment added");

    let stored = mapping::with_id(inserted.id, document);
    Ok(dto::data_with_message(
        StatusCode::OK,
        dto::document_to_json(&stored),
        "Comment added successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/api/movie/{idMovie}/comments/{idComment}",
    tag = "Comments",
    params(("idMovie" = String, Path, description = "Movie identifier"), ("idComment" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Successful operation"),
        (status = 400, description = "Bad Request. Invalid identifier."),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn get_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id_movie, id_comment)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (movie_id, comment_id) = parse_ids(&id_movie, &id_comment)?;

    let comment = services
        .store()
        .find_one(collections::COMMENTS, collections::comment_of(movie_id, comment_id))
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(dto::data(StatusCode::OK, dto::document_to_json(&comment)))
}

#[utoipa::path(
    put,
    path = "/api/movie/{idMovie}/comments/{idComment}",
    tag = "Comments",
    params(("idMovie" = String, Path, description = "Movie identifier"), ("idComment" = String, Path, description = "Comment identifier")),
    request_body(content = Object, description = "Fields to merge into the comment"),
    responses(
        (status = 200, description = "Comment updated successfully"),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn update_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id_movie, id_comment)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let (movie_id, comment_id) = parse_ids(&id_movie, &id_comment)?;
    let patch = mapping::comment_patch(dto::parse_update(body)?, movie_id)?;

    let outcome = services
        .store()
        .update_one(
            collections::COMMENTS,
            collections::comment_of(movie_id, comment_id),
            patch,
        )
        .await?;

    if !outcome.matched() {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    tracing::info!(%comment_id, modified = outcome.modified_count, "comment updated");
    Ok(dto::message(StatusCode::OK, "Comment updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/movie/{idMovie}/comments/{idComment}",
    tag = "Comments",
    params(("idMovie" = String, Path, description = "Movie identifier"), ("idComment" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment deleted successfully"),
        (status = 400, description = "Bad Request. Invalid identifier."),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn delete_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id_movie, id_comment)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (movie_id, comment_id) = parse_ids(&id_movie, &id_comment)?;
    let store = services.store();

    if store
        .find_one(collections::COMMENTS, collections::comment_of(movie_id, comment_id))
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    let outcome = store
        .delete_one(collections::COMMENTS, collections::comment_of(movie_id, comment_id))
        .await?;

    match outcome.deleted_count {
        1 => {
            tracing::info!(%comment_id, "comment deleted");
            Ok(dto::message(StatusCode::OK, "Comment deleted successfully"))
        }
        0 => Err(ApiError::NotFound("No comment was deleted")),
        n => Err(ApiError::Internal(format!("delete_one removed {n} comments"))),
    }
}
