//! Postgres-backed asset store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AssetStore, PurchaseOutcome};
use crate::asset::models::{Asset, NewAsset};
use crate::config::AppConfig;
use crate::error::StoreError;

macro_rules! asset_columns {
    () => {
        "id, original_name, mime_type, is_video, arweave_id, access_control_conditions, \
         lit_encrypted_key, title, description, price, creator, asset_pda, thumbnail, \
         category, purchased_by, created_at"
    };
}

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS assets (
        id UUID PRIMARY KEY,
        original_name TEXT NOT NULL,
        mime_type TEXT NOT NULL,
        is_video BOOLEAN NOT NULL DEFAULT FALSE,
        arweave_id TEXT NOT NULL,
        access_control_conditions JSONB,
        lit_encrypted_key JSONB,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (price >= 0),
        creator TEXT NOT NULL DEFAULT '',
        asset_pda TEXT NOT NULL DEFAULT '',
        thumbnail TEXT NOT NULL DEFAULT '',
        category TEXT NOT NULL DEFAULT 'General',
        purchased_by TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS assets_arweave_id_key ON assets (arweave_id)",
    "CREATE INDEX IF NOT EXISTS assets_creator_created_at_idx ON assets (creator, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS assets_purchased_by_idx ON assets USING GIN (purchased_by)",
];

const INSERT_ASSET: &str = concat!(
    r#"
    INSERT INTO assets (id, original_name, mime_type, is_video, arweave_id,
        access_control_conditions, lit_encrypted_key, title, description, price,
        creator, asset_pda, thumbnail, category)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
    ON CONFLICT (arweave_id) DO NOTHING
    RETURNING "#,
    asset_columns!()
);

const SELECT_ALL: &str = concat!(
    "SELECT ",
    asset_columns!(),
    " FROM assets ORDER BY created_at DESC"
);

const SELECT_BY_CREATOR: &str = concat!(
    "SELECT ",
    asset_columns!(),
    " FROM assets WHERE creator = $1 ORDER BY created_at DESC"
);

const SELECT_BY_BUYER: &str = concat!(
    "SELECT ",
    asset_columns!(),
    " FROM assets WHERE $1 = ANY(purchased_by) ORDER BY created_at DESC"
);

const SELECT_BY_ID: &str = concat!("SELECT ", asset_columns!(), " FROM assets WHERE id = $1");

// The membership test and the append happen in one statement, so two
// concurrent purchases by the same buyer cannot both succeed.
const APPEND_BUYER: &str = concat!(
    r#"
    UPDATE assets SET purchased_by = array_append(purchased_by, $2)
    WHERE id = $1 AND NOT ($2 = ANY(purchased_by))
    RETURNING "#,
    asset_columns!()
);

pub struct PgAssetStore {
    pool: PgPool,
}

impl PgAssetStore {
    /// Opens the pool and makes sure the `assets` table and its indexes exist.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
            .connect(&config.database_url)
            .await?;

        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        log::info!("Connected to Postgres asset store");
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStore for PgAssetStore {
    async fn insert_if_absent(&self, asset: NewAsset) -> Result<Option<Asset>, StoreError> {
        let inserted = sqlx::query_as::<_, Asset>(INSERT_ASSET)
            .bind(Uuid::new_v4())
            .bind(asset.original_name)
            .bind(asset.mime_type)
            .bind(asset.is_video)
            .bind(asset.arweave_id)
            .bind(asset.access_control_conditions)
            .bind(asset.lit_encrypted_key)
            .bind(asset.title)
            .bind(asset.description)
            .bind(asset.price)
            .bind(asset.creator)
            .bind(asset.asset_pda)
            .bind(asset.thumbnail)
            .bind(asset.category)
            .fetch_optional(&self.pool)
            .await?;

        Ok(inserted)
    }

    async fn find_all(&self) -> Result<Vec<Asset>, StoreError> {
        let assets = sqlx::query_as::<_, Asset>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(assets)
    }

    async fn find_by_creator(&self, creator: &str) -> Result<Vec<Asset>, StoreError> {
        let assets = sqlx::query_as::<_, Asset>(SELECT_BY_CREATOR)
            .bind(creator)
            .fetch_all(&self.pool)
            .await?;
        Ok(assets)
    }

    async fn find_by_buyer(&self, buyer: &str) -> Result<Vec<Asset>, StoreError> {
        let assets = sqlx::query_as::<_, Asset>(SELECT_BY_BUYER)
            .bind(buyer)
            .fetch_all(&self.pool)
            .await?;
        Ok(assets)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Asset>, StoreError> {
        let asset = sqlx::query_as::<_, Asset>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(asset)
    }

    async fn append_buyer(&self, id: &Uuid, buyer: &str) -> Result<PurchaseOutcome, StoreError> {
        let updated = sqlx::query_as::<_, Asset>(APPEND_BUYER)
            .bind(id)
            .bind(buyer)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(asset) = updated {
            return Ok(PurchaseOutcome::Purchased(asset));
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM assets WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(if exists {
            PurchaseOutcome::AlreadyPurchased
        } else {
            PurchaseOutcome::NotFound
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
