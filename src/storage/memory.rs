//! In-process asset store for local runs and tests. Nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{AssetStore, PurchaseOutcome};
use crate::asset::models::{Asset, NewAsset};
use crate::error::StoreError;

#[derive(Default)]
pub struct MemoryAssetStore {
    // insertion order
    assets: RwLock<Vec<Asset>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }

    /// Newest first; assets sharing a timestamp keep reverse insertion order.
    fn newest_first<F>(&self, predicate: F) -> Vec<Asset>
    where
        F: Fn(&Asset) -> bool,
    {
        let assets = self.assets.read();
        let mut matching: Vec<Asset> = assets
            .iter()
            .rev()
            .filter(|asset| predicate(asset))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn insert_if_absent(&self, asset: NewAsset) -> Result<Option<Asset>, StoreError> {
        let mut assets = self.assets.write();
        if assets.iter().any(|a| a.arweave_id == asset.arweave_id) {
            return Ok(None);
        }

        let asset = asset.into_asset(Uuid::new_v4(), Utc::now());
        assets.push(asset.clone());
        Ok(Some(asset))
    }

    async fn find_all(&self) -> Result<Vec<Asset>, StoreError> {
        Ok(self.newest_first(|_| true))
    }

    async fn find_by_creator(&self, creator: &str) -> Result<Vec<Asset>, StoreError> {
        Ok(self.newest_first(|asset| asset.creator == creator))
    }

    async fn find_by_buyer(&self, buyer: &str) -> Result<Vec<Asset>, StoreError> {
        Ok(self.newest_first(|asset| asset.purchased_by.iter().any(|b| b == buyer)))
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Asset>, StoreError> {
        Ok(self.assets.read().iter().find(|a| a.id == *id).cloned())
    }

    async fn append_buyer(&self, id: &Uuid, buyer: &str) -> Result<PurchaseOutcome, StoreError> {
        let mut assets = self.assets.write();
        let Some(asset) = assets.iter_mut().find(|a| a.id == *id) else {
            return Ok(PurchaseOutcome::NotFound);
        };

        if asset.purchased_by.iter().any(|b| b == buyer) {
            return Ok(PurchaseOutcome::AlreadyPurchased);
        }

        asset.purchased_by.push(buyer.to_string());
        Ok(PurchaseOutcome::Purchased(asset.clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}
