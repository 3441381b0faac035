use async_trait::async_trait;
use query_core::{QueryParams, SortSpecification};
use std::sync::Arc;

use crate::contract::{client::LotsApi, error::LotsError, model::Lot};
use crate::domain::service::Service;

/// Local implementation of the LotsApi trait that delegates to the domain service
pub struct LotsLocalClient {
    service: Arc<Service>,
}

impl LotsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl LotsApi for LotsLocalClient {
    async fn get_lot(&self, id: i64) -> Result<Lot, LotsError> {
        self.service.get_lot(id).await.map_err(Into::into)
    }

    async fn list_lots_by_owner(&self, owner_id: i64) -> Result<Vec<Lot>, LotsError> {
        self.service
            .list_lots_by_owner(owner_id)
            .await
            .map_err(Into::into)
    }

    async fn list_lots(
        &self,
        params: QueryParams,
        sort: SortSpecification,
    ) -> Result<Vec<Lot>, LotsError> {
        self.service
            .list_lots(&params, sort)
            .await
            .map_err(Into::into)
    }
}
