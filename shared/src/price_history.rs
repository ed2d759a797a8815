//! Append-only log of price observations, one row per successful lookup.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::{debug, info};

use crate::entity::crypto_prices::{self, PriceObservation};
use crate::error::StorageError;

/// Number of rows shown when a caller does not ask for a specific limit.
pub const DEFAULT_HISTORY_LIMIT: u64 = 10;

#[derive(Clone)]
pub struct PriceHistoryStore {
    db: Arc<DatabaseConnection>,
}

impl PriceHistoryStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates the `crypto_prices` table when it is missing. Existing rows are left alone.
    pub async fn initialize(&self) -> Result<(), StorageError> {
        migration::ensure_schema(self.db.as_ref()).await?;
        info!("Price history table is ready");
        Ok(())
    }

    /// Records one observation. `id` and `timestamp` are assigned here, never by the caller.
    pub async fn append(
        &self,
        user_id: i64,
        asset: &str,
        currency: &str,
        price: f64,
    ) -> Result<(), StorageError> {
        let row = crypto_prices::ActiveModel {
            user_id: Set(user_id),
            crypto: Set(asset.to_string()),
            currency: Set(currency.to_string()),
            price: Set(price),
            timestamp: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = crypto_prices::Entity::insert(row)
            .exec(self.db.as_ref())
            .await?;

        debug!(
            "Stored price observation {} for user {}: {} {} {}",
            inserted.last_insert_id, user_id, asset, price, currency
        );
        Ok(())
    }

    /// Up to `limit` observations of `user_id`, newest first.
    pub async fn recent(
        &self,
        user_id: i64,
        limit: u64,
    ) -> Result<Vec<PriceObservation>, StorageError> {
        if limit == 0 {
            return Err(StorageError::InvalidLimit(limit));
        }

        let rows = crypto_prices::Entity::find()
            .filter(crypto_prices::Column::UserId.eq(user_id))
            .order_by_desc(crypto_prices::Column::Timestamp)
            .order_by_desc(crypto_prices::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    pub async fn recent_default(&self, user_id: i64) -> Result<Vec<PriceObservation>, StorageError> {
        self.recent(user_id, DEFAULT_HISTORY_LIMIT).await
    }
}
