use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};

use super::r#trait::{DeleteOutcome, DocumentStore, InsertedDocument, StoreError, UpdateOutcome};

/// In-memory document store.
///
/// Intended for tests/dev. Filters support top-level equality only and
/// updates support `$set` only (dotted keys address nested fields).
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }

    fn matches(document: &Document, filter: &Document) -> bool {
        filter
            .iter()
            .all(|(key, expected)| document.get(key) == Some(expected))
    }

    fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
        match path.split_once('.') {
            Some((head, rest)) => match document.get(head) {
                Some(Bson::Document(inner)) => Self::get_path(inner, rest),
                _ => None,
            },
            None => document.get(path),
        }
    }

    /// Missing or non-document intermediate fields are replaced by documents.
    fn set_path(document: &mut Document, path: &str, value: Bson) {
        let Some((head, rest)) = path.split_once('.') else {
            document.insert(path, value);
            return;
        };
        if !matches!(document.get(head), Some(Bson::Document(_))) {
            document.insert(head, Document::new());
        }
        if let Some(Bson::Document(inner)) = document.get_mut(head) {
            Self::set_path(inner, rest, value);
        }
    }

    fn set_fields(update: Document) -> Result<Document, StoreError> {
        let mut fields = None;
        for (op, value) in update {
            match (op.as_str(), value) {
                ("$set", Bson::Document(doc)) => fields = Some(doc),
                (other, _) => {
                    return Err(StoreError::UnsupportedUpdate(format!(
                        "operator '{other}' is not supported in memory"
                    )));
                }
            }
        }
        fields.ok_or_else(|| StoreError::UnsupportedUpdate("update has no $set".to_string()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let Some(documents) = collections.get(collection) else {
            return Ok(vec![]);
        };

        let matching = documents.iter().filter(|d| Self::matches(d, &filter)).cloned();
        // Non-positive limits mean "no limit", as with the server.
        Ok(match limit {
            Some(n) if n > 0 => matching.take(n as usize).collect(),
            _ => matching.collect(),
        })
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| Self::matches(d, &filter)).cloned()))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertedDocument, StoreError> {
        let id = match document.get("_id") {
            None => ObjectId::new(),
            Some(Bson::ObjectId(oid)) => *oid,
            Some(other) => {
                return Err(StoreError::UnexpectedResult(format!(
                    "in-memory store only supports ObjectId _id, got {other}"
                )));
            }
        };

        // `_id` leads the stored document, as the server lays it out.
        let mut stored = Document::new();
        stored.insert("_id", id);
        for (key, value) in document {
            if key != "_id" {
                stored.insert(key, value);
            }
        }

        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        collections.entry(collection.to_string()).or_default().push(stored);

        Ok(InsertedDocument { id })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        let fields = Self::set_fields(update)?;

        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let Some(target) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| Self::matches(d, &filter)))
        else {
            return Ok(UpdateOutcome::default());
        };

        let mut modified = false;
        for (key, value) in fields {
            if Self::get_path(target, &key) != Some(&value) {
                Self::set_path(target, &key, value);
                modified = true;
            }
        }

        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<DeleteOutcome, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(DeleteOutcome::default());
        };

        match documents.iter().position(|d| Self::matches(d, &filter)) {
            Some(idx) => {
                documents.remove(idx);
                Ok(DeleteOutcome { deleted_count: 1 })
            }
            None => Ok(DeleteOutcome::default()),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.collections.read().map(|_| ()).map_err(|_| StoreError::Poisoned)
    }
}
