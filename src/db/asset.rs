//! Catalog operations

use super::AppState;
use crate::asset::models::{Asset, NewAsset, RegisterAssetRequest};
use crate::error::CatalogError;
use crate::storage::PurchaseOutcome;
use uuid::Uuid;

const COURSE_NOT_FOUND: &str = "Course not found";

/// Identifiers that do not parse can never match a stored asset.
fn parse_id(id: &str) -> Result<Uuid, CatalogError> {
    Uuid::parse_str(id).map_err(|_| CatalogError::not_found(COURSE_NOT_FOUND))
}

impl AppState {
    pub async fn register_asset(&self, request: RegisterAssetRequest) -> Result<Asset, CatalogError> {
        let new_asset = NewAsset::try_from(request)?;
        log::debug!("Registering asset with arweaveId '{}'", new_asset.arweave_id);

        self.store
            .insert_if_absent(new_asset)
            .await?
            .ok_or_else(|| CatalogError::conflict("Asset already exists"))
    }

    pub async fn list_all_assets(&self) -> Result<Vec<Asset>, CatalogError> {
        Ok(self.store.find_all().await?)
    }

    /// An empty creator is a valid filter; it matches assets registered
    /// without one.
    pub async fn list_by_creator(&self, creator: Option<&str>) -> Result<Vec<Asset>, CatalogError> {
        let creator = creator.ok_or_else(|| CatalogError::bad_request("Creator address required"))?;
        Ok(self.store.find_by_creator(creator).await?)
    }

    pub async fn list_purchased_by(&self, buyer: Option<&str>) -> Result<Vec<Asset>, CatalogError> {
        let buyer = buyer.ok_or_else(|| CatalogError::bad_request("Buyer address required"))?;
        Ok(self.store.find_by_buyer(buyer).await?)
    }

    pub async fn get_asset(&self, id: &str) -> Result<Asset, CatalogError> {
        let id = parse_id(id)?;
        self.store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| CatalogError::not_found(COURSE_NOT_FOUND))
    }

    /// An empty buyer is treated as missing.
    pub async fn purchase_asset(&self, id: &str, buyer: Option<&str>) -> Result<Asset, CatalogError> {
        let buyer = buyer
            .filter(|b| !b.is_empty())
            .ok_or_else(|| CatalogError::bad_request("Buyer address required"))?;
        let id = parse_id(id)?;

        match self.store.append_buyer(&id, buyer).await? {
            PurchaseOutcome::Purchased(asset) => Ok(asset),
            PurchaseOutcome::AlreadyPurchased => Err(CatalogError::conflict("Already purchased")),
            PurchaseOutcome::NotFound => Err(CatalogError::not_found(COURSE_NOT_FOUND)),
        }
    }
}
