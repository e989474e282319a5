//! MongoDB-backed document store.
//!
//! One `mongodb::Client` is created at process start and shared by every
//! request; the driver keeps its own connection pool behind it. Call
//! [`MongoDocumentStore::shutdown`] once the HTTP server has drained.

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection, Database};
use tracing::instrument;

use super::r#trait::{DeleteOutcome, DocumentStore, InsertedDocument, StoreError, UpdateOutcome};

/// MongoDB document store bound to one database.
#[derive(Debug, Clone)]
pub struct MongoDocumentStore {
    client: Client,
    database: Database,
}

impl MongoDocumentStore {
    /// Connect and verify reachability with a `ping`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let store = Self {
            database: client.database(database),
            client,
        };
        store.ping().await?;

        tracing::info!(database, "connected to MongoDB");
        Ok(store)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }

    /// Close pooled connections and end server sessions.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    #[instrument(skip(self, filter), err)]
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError> {
        let coll = self.collection(collection);
        let find = coll.find(filter);
        let cursor = match limit {
            Some(n) => find.limit(n).await?,
            None => find.await?,
        };
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, filter), err)]
    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    #[instrument(skip(self, document), err)]
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertedDocument, StoreError> {
        let result = self.collection(collection).insert_one(document).await?;
        match result.inserted_id {
            Bson::ObjectId(id) => Ok(InsertedDocument { id }),
            other => Err(StoreError::UnexpectedResult(format!(
                "inserted _id is not an ObjectId: {other}"
            ))),
        }
    }

    #[instrument(skip(self, filter, update), err)]
    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        let result = self.collection(collection).update_one(filter, update).await?;
        tracing::debug!(
            matched = result.matched_count,
            modified = result.modified_count,
            "update result"
        );
        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    #[instrument(skip(self, filter), err)]
    async fn delete_one(&self, collection: &str, filter: Document) -> Result<DeleteOutcome, StoreError> {
        let result = self.collection(collection).delete_one(filter).await?;
        Ok(DeleteOutcome {
            deleted_count: result.deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
