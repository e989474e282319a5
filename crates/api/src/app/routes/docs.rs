//! OpenAPI description of the HTTP surface, generated from the handler
//! annotations and the creation payload schemas.

use axum::Json;
use utoipa::OpenApi;

use mflix_core::{CommentDraft, Imdb, MovieDraft, Tomatoes, TomatoesViewer};

use super::{comments, movies};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sample Mflix API",
        version = "1.0.0",
        description = "CRUD over the sample_mflix movies and comments collections."
    ),
    paths(
        movies::list_movies,
        movies::create_movie,
        movies::get_movie,
        movies::update_movie,
        movies::delete_movie,
        comments::list_comments,
        comments::create_comment,
        comments::get_comment,
        comments::update_comment,
        comments::delete_comment,
    ),
    components(schemas(MovieDraft, CommentDraft, Imdb, Tomatoes, TomatoesViewer)),
    tags(
        (name = "Movies", description = "Endpoints related to movies"),
        (name = "Comments", description = "Endpoints related to comments")
    )
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn document() -> Value {
        serde_json::to_value(ApiDoc::openapi()).unwrap()
    }

    #[test]
    fn documents_every_resource_path() {
        let doc = document();
        assert_eq!(doc["info"]["title"], "Sample Mflix API");
        assert_eq!(doc["info"]["version"], "1.0.0");

        let paths = doc["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 4);
        let item = &paths["/api/movie/{idMovie}/comments/{idComment}"];
        for method in ["get", "put", "delete"] {
            assert!(item[method].is_object(), "{method}");
        }
        assert_eq!(paths["/api/movies"]["post"]["tags"][0], "Movies");
    }

    #[test]
    fn schemas_list_required_fields() {
        let doc = document();
        let schemas = &doc["components"]["schemas"];

        let movie = schemas["Movie"]["required"].as_array().unwrap();
        assert_eq!(movie.len(), mflix_core::MOVIE_REQUIRED_FIELDS.len());
        assert!(movie.contains(&Value::from("type")));

        let comment = schemas["Comment"]["required"].as_array().unwrap();
        assert_eq!(comment.len(), mflix_core::COMMENT_REQUIRED_FIELDS.len());
    }
}
