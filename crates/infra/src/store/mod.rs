//! Document store boundary.
//!
//! Handlers talk to the database only through [`DocumentStore`]; the
//! MongoDB implementation is used in production and the in-memory one in
//! tests and local development.

pub mod in_memory;
pub mod mongo;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use mongo::MongoDocumentStore;
pub use r#trait::{
    DEFAULT_FIND_LIMIT, DeleteOutcome, DocumentStore, InsertedDocument, StoreError, UpdateOutcome,
};
