use async_trait::async_trait;
use query_core::{QueryParams, SortSpecification};

use crate::contract::{error::LotsError, model::Lot};

/// Public API trait for the lots module that other modules can use
#[async_trait]
pub trait LotsApi: Send + Sync {
    /// Get a lot by ID
    async fn get_lot(&self, id: i64) -> Result<Lot, LotsError>;

    /// All lots published by one owner
    async fn list_lots_by_owner(&self, owner_id: i64) -> Result<Vec<Lot>, LotsError>;

    /// Filtered and sorted listing, same grammar as `GET /api/lots`
    async fn list_lots(
        &self,
        params: QueryParams,
        sort: SortSpecification,
    ) -> Result<Vec<Lot>, LotsError>;
}
