//! Persistence seam for the asset collection.
//!
//! Both conditional writes are atomic in every implementation: a
//! registration cannot slip past the `arweaveId` check, and a buyer cannot
//! be appended twice, no matter how requests interleave.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::asset::models::{Asset, NewAsset};
use crate::error::StoreError;

pub use memory::MemoryAssetStore;
pub use postgres::PgAssetStore;

#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Purchased(Asset),
    AlreadyPurchased,
    NotFound,
}

#[async_trait]
pub trait AssetStore {
    /// Inserts the asset unless one with the same `arweave_id` exists.
    /// Returns `None` when the id is taken.
    async fn insert_if_absent(&self, asset: NewAsset) -> Result<Option<Asset>, StoreError>;

    /// All results below are ordered newest `created_at` first.
    async fn find_all(&self) -> Result<Vec<Asset>, StoreError>;

    async fn find_by_creator(&self, creator: &str) -> Result<Vec<Asset>, StoreError>;

    async fn find_by_buyer(&self, buyer: &str) -> Result<Vec<Asset>, StoreError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Asset>, StoreError>;

    /// Appends `buyer` to the asset's `purchased_by` unless already present.
    async fn append_buyer(&self, id: &Uuid, buyer: &str) -> Result<PurchaseOutcome, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases any held connections. Called once at shutdown.
    async fn close(&self);
}
