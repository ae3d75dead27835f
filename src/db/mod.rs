//! Application state shared by every handler.
//!
//! - `asset` - catalog operations layered over the [`AssetStore`]

mod asset;

use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::error::StoreError;
use crate::storage::{AssetStore, MemoryAssetStore, PgAssetStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AssetStore + Send + Sync>,
}

impl AppState {
    pub async fn new_with_config(config: &AppConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn AssetStore + Send + Sync> = match config.store_backend {
            StoreBackend::Postgres => Arc::new(PgAssetStore::connect(config).await?),
            StoreBackend::Memory => {
                log::warn!("Using in-memory asset store; data is lost on restart");
                Arc::new(MemoryAssetStore::new())
            }
        };

        Ok(Self::new_with_store(store))
    }

    pub fn new_with_store(store: Arc<dyn AssetStore + Send + Sync>) -> Self {
        AppState { store }
    }

    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}
