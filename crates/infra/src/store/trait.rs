use std::sync::Arc;

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use thiserror::Error;

/// Default cap on `find_many` results for unpaginated listings.
pub const DEFAULT_FIND_LIMIT: i64 = 10;

/// Descriptor of a freshly inserted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedDocument {
    pub id: ObjectId,
}

/// Outcome of `update_one`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents matched by the filter (0 or 1).
    pub matched_count: u64,
    /// Documents whose content actually changed (0 or 1).
    pub modified_count: u64,
}

impl UpdateOutcome {
    pub fn matched(&self) -> bool {
        self.matched_count > 0
    }
}

/// Outcome of `delete_one`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

/// Document store operation error.
///
/// These are **infrastructure errors**; callers surface them as opaque
/// server failures. Nothing here is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("unsupported update: {0}")]
    UnsupportedUpdate(String),

    #[error("unexpected store result: {0}")]
    UnexpectedResult(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Generic document access, parameterized by collection name and filter.
///
/// ## Semantics
///
/// - Filters are BSON documents; implementations must at least support
///   top-level equality (`{ "_id": oid, "movie_id": oid }`).
/// - `find_many` returns documents in store order, truncated at `limit`
///   when one is given.
/// - `update_one` takes an update document (`{ "$set": { ... } }`) and
///   reports both whether a document matched and whether it changed.
/// - `delete_one` removes at most one matching document.
///
/// Implementations must be shareable across request tasks; handlers hold an
/// `Arc<dyn DocumentStore>` for the lifetime of the process.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertedDocument, StoreError>;

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, StoreError>;

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<DeleteOutcome, StoreError>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).find_many(collection, filter, limit).await
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError> {
        (**self).find_one(collection, filter).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertedDocument, StoreError> {
        (**self).insert_one(collection, document).await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        (**self).update_one(collection, filter, update).await
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<DeleteOutcome, StoreError> {
        (**self).delete_one(collection, filter).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}
