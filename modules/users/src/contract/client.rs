use async_trait::async_trait;
use query_core::{QueryParams, SortSpecification};

use crate::contract::{error::UsersError, model::User};

/// Public API trait for the users module that other modules can use
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Get a user by ID
    async fn get_user(&self, id: i64) -> Result<User, UsersError>;

    /// Look a user up by login name
    async fn get_user_by_username(&self, username: &str) -> Result<User, UsersError>;

    /// Filtered and sorted listing, same grammar as `GET /api/users`
    async fn list_users(
        &self,
        params: QueryParams,
        sort: SortSpecification,
    ) -> Result<Vec<User>, UsersError>;
}
