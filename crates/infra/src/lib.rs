//! Infrastructure layer: document store adapters, BSON mapping, config.

pub mod collections;
pub mod config;
pub mod mapping;
pub mod store;

pub use config::{AppConfig, ConfigError, HttpConfig, StoreConfig, StoreKind};
pub use store::{
    DEFAULT_FIND_LIMIT, DeleteOutcome, DocumentStore, InMemoryDocumentStore, InsertedDocument,
    MongoDocumentStore, StoreError, UpdateOutcome,
};
