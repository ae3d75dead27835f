use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::CatalogError;

pub const DEFAULT_CATEGORY: &str = "General";

/// A registered piece of content and its marketplace metadata.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(rename = "_id")]
    #[schema(example = "a1b2c3d4-e5f6-7890-1234-567890abcdef")]
    pub id: Uuid,
    #[schema(example = "lesson-01.mp4")]
    pub original_name: String,
    #[schema(example = "video/mp4")]
    pub mime_type: String,
    pub is_video: bool,
    #[schema(example = "bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U")]
    pub arweave_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub access_control_conditions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub lit_encrypted_key: Option<Value>,
    #[schema(example = "Intro to Rust")]
    pub title: String,
    pub description: String,
    #[schema(example = 10.0)]
    pub price: f64,
    pub creator: String,
    #[serde(rename = "assetPDA")]
    pub asset_pda: String,
    pub thumbnail: String,
    #[schema(example = "General")]
    pub category: String,
    pub purchased_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/assets`. Every field is optional on the wire so that
/// missing values can be defaulted or reported individually.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAssetRequest {
    #[schema(example = "lesson-01.mp4")]
    pub original_name: Option<String>,
    #[schema(example = "video/mp4")]
    pub mime_type: Option<String>,
    pub is_video: Option<bool>,
    pub arweave_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub lit_encrypted_key: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub access_control_conditions: Option<Value>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub creator: Option<String>,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "assetPDA")]
    pub asset_pda: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PurchaseRequest {
    #[schema(example = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU")]
    pub buyer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatorQuery {
    pub creator: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BuyerQuery {
    pub buyer: Option<String>,
}

/// A validated registration with every default applied. The store assigns
/// the identifier and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub original_name: String,
    pub mime_type: String,
    pub is_video: bool,
    pub arweave_id: String,
    pub access_control_conditions: Option<Value>,
    pub lit_encrypted_key: Option<Value>,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub creator: String,
    pub asset_pda: String,
    pub thumbnail: String,
    pub category: String,
}

impl NewAsset {
    pub fn into_asset(self, id: Uuid, created_at: DateTime<Utc>) -> Asset {
        Asset {
            id,
            original_name: self.original_name,
            mime_type: self.mime_type,
            is_video: self.is_video,
            arweave_id: self.arweave_id,
            access_control_conditions: self.access_control_conditions,
            lit_encrypted_key: self.lit_encrypted_key,
            title: self.title,
            description: self.description,
            price: self.price,
            creator: self.creator,
            asset_pda: self.asset_pda,
            thumbnail: self.thumbnail,
            category: self.category,
            purchased_by: Vec::new(),
            created_at,
        }
    }
}

/// Empty strings count as absent for defaulted text fields.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, CatalogError> {
    present(value).ok_or_else(|| CatalogError::bad_request(format!("{} is required", field)))
}

impl TryFrom<RegisterAssetRequest> for NewAsset {
    type Error = CatalogError;

    fn try_from(req: RegisterAssetRequest) -> Result<Self, Self::Error> {
        let original_name = required(req.original_name, "originalName")?;
        let mime_type = required(req.mime_type, "mimeType")?;
        let arweave_id = required(req.arweave_id, "arweaveId")?;

        let price = req.price.unwrap_or(0.0);
        if !price.is_finite() || price < 0.0 {
            return Err(CatalogError::bad_request(
                "price must be a non-negative number",
            ));
        }

        Ok(NewAsset {
            title: present(req.title).unwrap_or_else(|| original_name.clone()),
            original_name,
            mime_type,
            is_video: req.is_video.unwrap_or(false),
            arweave_id,
            access_control_conditions: req.access_control_conditions,
            lit_encrypted_key: req.lit_encrypted_key,
            description: req.description.unwrap_or_default(),
            price,
            creator: req.creator.unwrap_or_default(),
            asset_pda: req.asset_pda.unwrap_or_default(),
            thumbnail: req.thumbnail.unwrap_or_default(),
            category: present(req.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        })
    }
}
