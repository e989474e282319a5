//! Collection names and the filters used against them.

use bson::{doc, Document};

use mflix_core::{CommentId, MovieId};

pub const MOVIES: &str = "movies";
pub const COMMENTS: &str = "comments";

/// Select one movie by identifier.
pub fn movie_by_id(id: MovieId) -> Document {
    doc! { "_id": *id.as_object_id() }
}

/// Select every comment attached to a movie.
pub fn comments_of(movie_id: MovieId) -> Document {
    doc! { "movie_id": *movie_id.as_object_id() }
}

/// Select one comment, scoped to its parent movie.
///
/// A comment is never reachable under a different movie identifier.
pub fn comment_of(movie_id: MovieId, comment_id: CommentId) -> Document {
    doc! {
        "_id": *comment_id.as_object_id(),
        "movie_id": *movie_id.as_object_id(),
    }
}
