use async_trait::async_trait;
use chrono::{DateTime, Utc};
use modkit_db::filter::LowerError;
use query_core::QueryOptions;
use thiserror::Error;

use crate::contract::model::{Lot, NewLot};

/// Failure of a filtered read: either the options could not be lowered
/// for this entity, or the store failed.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Query(#[from] LowerError),

    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait LotsRepository: Send + Sync {
    /// Insert a validated lot; the store assigns the id.
    async fn create(&self, new_lot: NewLot, at: DateTime<Utc>) -> anyhow::Result<Lot>;
    /// Load a lot by id.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Lot>>;
    /// All lots of one owner, newest first.
    async fn find_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Lot>>;
    /// Filtered, ordered listing.
    async fn find_with_options(&self, opts: &QueryOptions) -> Result<Vec<Lot>, RepoError>;
    /// Write back a lot, scoped by `id` and `owner_id`. False when no row matched.
    async fn update(&self, lot: &Lot) -> anyhow::Result<bool>;
    /// Delete by id, scoped by owner. False when no row matched.
    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<bool>;
}
