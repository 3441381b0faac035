use async_trait::async_trait;
use chrono::{DateTime, Utc};
use modkit_db::filter::LowerError;
use query_core::QueryOptions;
use thiserror::Error;

use crate::contract::model::{NewUser, User};

/// Failure of a filtered read.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Query(#[from] LowerError),

    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Insert a validated user; the store assigns the id.
    async fn create(&self, new_user: NewUser, at: DateTime<Utc>) -> anyhow::Result<User>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    /// Filtered, ordered listing.
    async fn find_with_options(&self, opts: &QueryOptions) -> Result<Vec<User>, RepoError>;
    /// Write back the mutable attributes of `user` on behalf of `owner_id`.
    /// A user owns only its own row; false when no row matched.
    async fn update(&self, user: &User, owner_id: i64) -> anyhow::Result<bool>;
    /// Delete `id` on behalf of `owner_id`. False when no row matched.
    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<bool>;
}
