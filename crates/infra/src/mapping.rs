//! Mapping between domain records, BSON documents and response JSON.
//!
//! Records are written field by field so the stored layout does not depend on
//! serde attributes: dates become native BSON dates and `movie_id` becomes an
//! `ObjectId`. Documents read back are rendered as plain JSON (hex
//! identifiers, RFC 3339 dates) rather than extended JSON.

use bson::{doc, oid::ObjectId, Bson, Document};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use mflix_core::{
    datetime, Comment, DomainError, DomainResult, Imdb, Movie, MovieId, Tomatoes,
    COMMENT_DATE_FIELDS, MOVIE_DATE_FIELDS,
};

fn bson_date(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

fn imdb_document(imdb: Imdb) -> Document {
    let mut out = Document::new();
    if let Some(rating) = imdb.rating {
        out.insert("rating", rating);
    }
    if let Some(votes) = imdb.votes {
        out.insert("votes", votes);
    }
    if let Some(id) = imdb.id {
        out.insert("id", id);
    }
    out
}

fn tomatoes_document(tomatoes: Tomatoes) -> Document {
    let mut out = Document::new();
    if let Some(viewer) = tomatoes.viewer {
        let mut v = Document::new();
        if let Some(rating) = viewer.rating {
            v.insert("rating", rating);
        }
        if let Some(num_reviews) = viewer.num_reviews {
            v.insert("numReviews", num_reviews);
        }
        if let Some(meter) = viewer.meter {
            v.insert("meter", meter);
        }
        out.insert("viewer", v);
    }
    if let Some(last_updated) = tomatoes.last_updated {
        out.insert("lastUpdated", bson_date(last_updated));
    }
    out
}

/// Stored layout of a movie (without `_id`).
pub fn movie_document(movie: Movie) -> Document {
    doc! {
        "plot": movie.plot,
        "genres": movie.genres,
        "runtime": movie.runtime,
        "cast": movie.cast,
        "poster": movie.poster,
        "title": movie.title,
        "fullplot": movie.fullplot,
        "languages": movie.languages,
        "released": bson_date(movie.released),
        "directors": movie.directors,
        "rated": movie.rated,
        "awards": movie.awards,
        "lastupdated": bson_date(movie.lastupdated),
        "year": movie.year,
        "imdb": imdb_document(movie.imdb),
        "countries": movie.countries,
        "type": movie.kind,
        "tomatoes": tomatoes_document(movie.tomatoes),
        "num_mflix_comments": movie.num_mflix_comments,
    }
}

/// Stored layout of a comment (without `_id`).
pub fn comment_document(comment: Comment) -> Document {
    doc! {
        "name": comment.name,
        "email": comment.email,
        "text": comment.text,
        "date": bson_date(comment.date),
        "movie_id": ObjectId::from(comment.movie_id),
    }
}

/// Prepend the store-assigned identifier to a document.
pub fn with_id(id: ObjectId, document: Document) -> Document {
    let mut out = doc! { "_id": id };
    for (key, value) in document {
        if key != "_id" {
            out.insert(key, value);
        }
    }
    out
}

/// Convert update fields to BSON, storing the listed date paths as native
/// dates. A date path may arrive nested (`{"tomatoes": {"lastUpdated": ..}}`)
/// or as a dotted key (`{"tomatoes.lastUpdated": ..}`).
fn set_fields(fields: &Map<String, Value>, date_fields: &[&str]) -> DomainResult<Document> {
    let mut set = bson::to_document(fields)
        .map_err(|err| DomainError::UnsupportedValue(err.to_string()))?;
    for path in date_fields {
        coerce_date(&mut set, path, path)?;
    }
    Ok(set)
}

fn coerce_date(document: &mut Document, path: &str, field: &str) -> DomainResult<()> {
    if let Some(value) = document.get_mut(path) {
        return store_as_date(value, field);
    }
    match path.split_once('.') {
        Some((head, rest)) => match document.get_mut(head) {
            Some(Bson::Document(inner)) => coerce_date(inner, rest, field),
            _ => Ok(()),
        },
        None => Ok(()),
    }
}

fn store_as_date(value: &mut Bson, field: &str) -> DomainResult<()> {
    let parsed = match &*value {
        Bson::String(text) => datetime::parse(text),
        Bson::Int64(ms) => DateTime::from_timestamp_millis(*ms),
        Bson::Int32(ms) => DateTime::from_timestamp_millis(i64::from(*ms)),
        _ => None,
    };
    let parsed =
        parsed.ok_or_else(|| DomainError::validation(format!("{field} is not a valid date.")))?;
    *value = Bson::DateTime(bson_date(parsed));
    Ok(())
}

/// `$set` update merging fields into a movie.
pub fn movie_patch(fields: Map<String, Value>) -> DomainResult<Document> {
    let set = set_fields(&fields, &MOVIE_DATE_FIELDS)?;
    Ok(doc! { "$set": set })
}

/// `$set` update merging fields into a comment of `movie_id`.
///
/// The body may restate the parent movie but never move the comment to
/// another one; a restated `movie_id` is stored as an `ObjectId`.
pub fn comment_patch(mut fields: Map<String, Value>, movie_id: MovieId) -> DomainResult<Document> {
    let parent = fields.remove("movie_id");
    if let Some(raw) = &parent {
        let restated = raw.as_str().and_then(|hex| hex.parse::<MovieId>().ok());
        if restated != Some(movie_id) {
            return Err(DomainError::validation("movie_id does not match idMovie."));
        }
    }

    let mut set = set_fields(&fields, &COMMENT_DATE_FIELDS)?;
    if parent.is_some() {
        set.insert("movie_id", *movie_id.as_object_id());
    }
    Ok(doc! { "$set": set })
}

/// Render a BSON value as plain JSON.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match DateTime::from_timestamp_millis(dt.timestamp_millis()) {
            Some(utc) => Value::String(datetime::to_canonical(&utc)),
            None => value.clone().into_relaxed_extjson(),
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(n) => Value::from(*n),
        Bson::Int64(n) => Value::from(*n),
        Bson::Double(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::Null | Bson::Undefined => Value::Null,
        other => other.clone().into_relaxed_extjson(),
    }
}

/// Render a BSON document as a plain JSON object.
pub fn document_to_json(document: &Document) -> Value {
    Value::Object(
        document
            .iter()
            .map(|(key, value)| (key.clone(), bson_to_json(value)))
            .collect(),
    )
}
