//! Comments left on movies.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::datetime;
use crate::error::{DomainError, DomainResult};
use crate::id::MovieId;

/// Fields that must be present (and non-null) to create a comment.
pub const COMMENT_REQUIRED_FIELDS: [&str; 5] = ["name", "email", "text", "date", "movie_id"];

/// Fields stored as native dates.
pub const COMMENT_DATE_FIELDS: [&str; 1] = ["date"];

/// A complete comment record.
///
/// `movie_id` references a movie but is never checked for existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub name: String,
    pub email: String,
    pub text: String,
    pub date: DateTime<Utc>,
    pub movie_id: MovieId,
}

impl Comment {
    /// Reject a comment created under a movie other than the one it names.
    pub fn ensure_belongs_to(&self, movie_id: MovieId) -> DomainResult<()> {
        if self.movie_id == movie_id {
            Ok(())
        } else {
            Err(DomainError::validation("movie_id does not match idMovie."))
        }
    }
}

/// Creation payload as received from a client.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[schema(as = Comment)]
pub struct CommentDraft {
    #[schema(required = true)]
    pub name: Option<String>,
    #[schema(required = true)]
    pub email: Option<String>,
    #[schema(required = true)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "datetime::deserialize_option")]
    #[schema(required = true)]
    pub date: Option<DateTime<Utc>>,
    #[schema(required = true, pattern = "^[0-9a-fA-F]{24}$")]
    pub movie_id: Option<String>,
}

impl CommentDraft {
    /// Required fields that are absent or `null`, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.name.is_some(),
            self.email.is_some(),
            self.text.is_some(),
            self.date.is_some(),
            self.movie_id.is_some(),
        ];

        COMMENT_REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(field, _)| *field)
            .collect()
    }

    /// Validate required-field presence and the `movie_id` format.
    pub fn into_comment(self) -> DomainResult<Comment> {
        let missing = self.missing_fields();

        let (Some(name), Some(email), Some(text), Some(date), Some(movie_id)) =
            (self.name, self.email, self.text, self.date, self.movie_id)
        else {
            return Err(DomainError::MissingFields(missing));
        };

        Ok(Comment {
            name,
            email,
            text,
            date,
            movie_id: movie_id.parse()?,
        })
    }
}
