#![allow(dead_code)]

use std::sync::Arc;

use asset_catalog_server::asset::models::{Asset, NewAsset};
use asset_catalog_server::error::StoreError;
use asset_catalog_server::storage::{AssetStore, MemoryAssetStore, PurchaseOutcome};
use asset_catalog_server::AppState;
use serde_json::{json, Value};
use uuid::Uuid;

/// App state over a fresh in-memory store. The store handle is returned so
/// tests can inspect what was persisted.
pub fn memory_state() -> (Arc<MemoryAssetStore>, AppState) {
    let store = Arc::new(MemoryAssetStore::new());
    let state = AppState::new_with_store(store.clone());
    (store, state)
}

pub fn failing_state() -> AppState {
    AppState::new_with_store(Arc::new(FailingStore))
}

pub fn register_body(arweave_id: &str, creator: &str) -> Value {
    json!({
        "arweaveId": arweave_id,
        "originalName": format!("{}.mp4", arweave_id),
        "mimeType": "video/mp4",
        "isVideo": true,
        "creator": creator,
        "price": 10
    })
}

/// Store whose every operation fails as if the database were down.
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait::async_trait]
impl AssetStore for FailingStore {
    async fn insert_if_absent(&self, _asset: NewAsset) -> Result<Option<Asset>, StoreError> {
        Err(unavailable())
    }

    async fn find_all(&self) -> Result<Vec<Asset>, StoreError> {
        Err(unavailable())
    }

    async fn find_by_creator(&self, _creator: &str) -> Result<Vec<Asset>, StoreError> {
        Err(unavailable())
    }

    async fn find_by_buyer(&self, _buyer: &str) -> Result<Vec<Asset>, StoreError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: &Uuid) -> Result<Option<Asset>, StoreError> {
        Err(unavailable())
    }

    async fn append_buyer(&self, _id: &Uuid, _buyer: &str) -> Result<PurchaseOutcome, StoreError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn close(&self) {}
}
