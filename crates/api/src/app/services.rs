//! Infrastructure wiring: which document store backs the handlers.

use std::sync::Arc;

use thiserror::Error;

use mflix_infra::{
    ConfigError, DocumentStore, InMemoryDocumentStore, MongoDocumentStore, StoreConfig, StoreError,
    StoreKind,
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shared, immutable handles injected into every handler.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn DocumentStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Services over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

/// The process-lifetime store plus whatever must be torn down at exit.
pub struct Backend {
    services: AppServices,
    mongo: Option<MongoDocumentStore>,
}

impl Backend {
    /// Open the configured store once, at process start.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StartupError> {
        match config.kind {
            StoreKind::Memory => {
                tracing::warn!("using in-memory store; data is lost on exit");
                Ok(Self {
                    services: AppServices::in_memory(),
                    mongo: None,
                })
            }
            StoreKind::Mongo => {
                let uri = config
                    .uri
                    .as_deref()
                    .ok_or(ConfigError::Missing("MONGODB_URI"))?;
                let mongo = MongoDocumentStore::connect(uri, &config.database).await?;
                Ok(Self {
                    services: AppServices::new(Arc::new(mongo.clone())),
                    mongo: Some(mongo),
                })
            }
        }
    }

    pub fn services(&self) -> AppServices {
        self.services.clone()
    }

    /// Release store resources; call after the server has stopped.
    pub async fn shutdown(self) {
        if let Some(mongo) = self.mongo {
            mongo.shutdown().await;
        }
    }
}
