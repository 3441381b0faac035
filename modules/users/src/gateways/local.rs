use async_trait::async_trait;
use query_core::{QueryParams, SortSpecification};
use std::sync::Arc;

use crate::contract::{client::UsersApi, error::UsersError, model::User};
use crate::domain::service::Service;

/// Local implementation of the UsersApi trait that delegates to the domain service
pub struct UsersLocalClient {
    service: Arc<Service>,
}

impl UsersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersApi for UsersLocalClient {
    async fn get_user(&self, id: i64) -> Result<User, UsersError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, UsersError> {
        self.service
            .get_user_by_username(username)
            .await
            .map_err(Into::into)
    }

    async fn list_users(
        &self,
        params: QueryParams,
        sort: SortSpecification,
    ) -> Result<Vec<User>, UsersError> {
        self.service
            .list_users(&params, sort)
            .await
            .map_err(Into::into)
    }
}
