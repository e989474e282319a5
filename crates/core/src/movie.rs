//! Movie records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::datetime;
use crate::error::{DomainError, DomainResult};

/// Fields that must be present (and non-null) to create a movie, in the
/// order they are reported.
pub const MOVIE_REQUIRED_FIELDS: [&str; 19] = [
    "plot",
    "genres",
    "runtime",
    "cast",
    "poster",
    "title",
    "fullplot",
    "languages",
    "released",
    "directors",
    "rated",
    "awards",
    "lastupdated",
    "year",
    "imdb",
    "countries",
    "type",
    "tomatoes",
    "num_mflix_comments",
];

/// Fields stored as native dates, as dotted paths.
pub const MOVIE_DATE_FIELDS: [&str; 3] = ["released", "lastupdated", "tomatoes.lastUpdated"];

/// IMDb ratings snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Imdb {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
    /// External IMDb identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// Rotten Tomatoes audience score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TomatoesViewer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, rename = "numReviews", skip_serializing_if = "Option::is_none")]
    pub num_reviews: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter: Option<i64>,
}

/// Rotten Tomatoes snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Tomatoes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<TomatoesViewer>,
    #[serde(
        default,
        rename = "lastUpdated",
        deserialize_with = "datetime::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A complete movie record, ready to be persisted.
///
/// Identity is not part of the record: the store assigns it on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub plot: String,
    pub genres: Vec<String>,
    pub runtime: i64,
    pub cast: Vec<String>,
    pub poster: String,
    pub title: String,
    pub fullplot: String,
    pub languages: Vec<String>,
    pub released: DateTime<Utc>,
    pub directors: Vec<String>,
    pub rated: String,
    pub awards: String,
    pub lastupdated: DateTime<Utc>,
    pub year: i64,
    pub imdb: Imdb,
    pub countries: Vec<String>,
    pub kind: String,
    pub tomatoes: Tomatoes,
    pub num_mflix_comments: i64,
}

/// Creation payload as received from a client.
///
/// Every field is optional at the type level so that absence and `null` can
/// be reported together by [`MovieDraft::into_movie`] instead of failing at
/// the first missing key. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[schema(as = Movie)]
pub struct MovieDraft {
    #[schema(required = true)]
    pub plot: Option<String>,
    #[schema(required = true)]
    pub genres: Option<Vec<String>>,
    #[schema(required = true)]
    pub runtime: Option<i64>,
    #[schema(required = true)]
    pub cast: Option<Vec<String>>,
    #[schema(required = true)]
    pub poster: Option<String>,
    #[schema(required = true)]
    pub title: Option<String>,
    #[schema(required = true)]
    pub fullplot: Option<String>,
    #[schema(required = true)]
    pub languages: Option<Vec<String>>,
    #[serde(default, deserialize_with = "datetime::deserialize_option")]
    #[schema(required = true)]
    pub released: Option<DateTime<Utc>>,
    #[schema(required = true)]
    pub directors: Option<Vec<String>>,
    #[schema(required = true)]
    pub rated: Option<String>,
    #[schema(required = true)]
    pub awards: Option<String>,
    #[serde(default, deserialize_with = "datetime::deserialize_option")]
    #[schema(required = true)]
    pub lastupdated: Option<DateTime<Utc>>,
    #[schema(required = true)]
    pub year: Option<i64>,
    #[schema(required = true)]
    pub imdb: Option<Imdb>,
    #[schema(required = true)]
    pub countries: Option<Vec<String>>,
    #[serde(rename = "type")]
    #[schema(required = true)]
    pub kind: Option<String>,
    #[schema(required = true)]
    pub tomatoes: Option<Tomatoes>,
    #[schema(required = true)]
    pub num_mflix_comments: Option<i64>,
}

impl MovieDraft {
    /// Required fields that are absent or `null`, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.plot.is_some(),
            self.genres.is_some(),
            self.runtime.is_some(),
            self.cast.is_some(),
            self.poster.is_some(),
            self.title.is_some(),
            self.fullplot.is_some(),
            self.languages.is_some(),
            self.released.is_some(),
            self.directors.is_some(),
            self.rated.is_some(),
            self.awards.is_some(),
            self.lastupdated.is_some(),
            self.year.is_some(),
            self.imdb.is_some(),
            self.countries.is_some(),
            self.kind.is_some(),
            self.tomatoes.is_some(),
            self.num_mflix_comments.is_some(),
        ];

        MOVIE_REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(field, _)| *field)
            .collect()
    }

    /// Validate required-field presence and produce a complete record.
    pub fn into_movie(self) -> DomainResult<Movie> {
        let missing = self.missing_fields();

        let (
            Some(plot),
            Some(genres),
            Some(runtime),
            Some(cast),
            Some(poster),
            Some(title),
            Some(fullplot),
            Some(languages),
            Some(released),
            Some(directors),
            Some(rated),
            Some(awards),
            Some(lastupdated),
            Some(year),
            Some(imdb),
            Some(countries),
            Some(kind),
            Some(tomatoes),
            Some(num_mflix_comments),
        ) = (
            self.plot,
            self.genres,
            self.runtime,
            self.cast,
            self.poster,
            self.title,
            self.fullplot,
            self.languages,
            self.released,
            self.directors,
            self.rated,
            self.awards,
            self.lastupdated,
            self.year,
            self.imdb,
            self.countries,
            self.kind,
            self.tomatoes,
            self.num_mflix_comments,
        )
        else {
            return Err(DomainError::MissingFields(missing));
        };

        Ok(Movie {
            plot,
            genres,
            runtime,
            cast,
            poster,
            title,
            fullplot,
            languages,
            released,
            directors,
            rated,
            awards,
            lastupdated,
            year,
            imdb,
            countries,
            kind,
            tomatoes,
            num_mflix_comments,
        })
    }
}
