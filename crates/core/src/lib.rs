//! `mflix-core`: domain shapes for the movie catalogue.
//!
//! This crate contains **pure domain** types (no database or HTTP concerns):
//! the `Movie` and `Comment` records, the creation drafts that enforce
//! required-field presence, and typed document identifiers.

pub mod comment;
pub mod datetime;
pub mod error;
pub mod id;
pub mod movie;

pub use comment::{Comment, CommentDraft, COMMENT_DATE_FIELDS, COMMENT_REQUIRED_FIELDS};
pub use error::{DomainError, DomainResult};
pub use id::{CommentId, MovieId};
pub use movie::{
    Imdb, Movie, MovieDraft, Tomatoes, TomatoesViewer, MOVIE_DATE_FIELDS, MOVIE_REQUIRED_FIELDS,
};
