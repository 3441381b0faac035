//! SeaORM-backed repository implementation for the domain port.

use anyhow::Context;
use chrono::{DateTime, Utc};
use modkit_db::filter::{FieldMap, QueryOptionsExt};
use query_core::QueryOptions;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet,
    QueryFilter, Set,
};

use crate::contract::model::{NewUser, User};
use crate::domain::repo::{RepoError, UsersRepository};
use crate::infra::storage::entity::{ActiveModel as UserAM, Column, Entity as UserEntity};
use crate::infra::storage::fields::user_field_map;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    fields: FieldMap<UserEntity>,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            fields: user_field_map(),
        }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create(&self, n: NewUser, at: DateTime<Utc>) -> anyhow::Result<User> {
        let m = UserAM {
            id: NotSet,
            username: Set(n.username),
            email: Set(n.email),
            given_name: Set(n.given_name),
            family_name: Set(n.family_name),
            created_at: Set(at),
            updated_at: Set(at),
        };
        let inserted = m.insert(&self.conn).await.context("insert failed")?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let found = UserEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let found = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_by_email failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let found = UserEntity::find()
            .filter(Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("find_by_username failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_with_options(&self, opts: &QueryOptions) -> Result<Vec<User>, RepoError> {
        let rows = UserEntity::find()
            .apply_query_options(opts, &self.fields)?
            .all(&self.conn)
            .await
            .context("find_with_options failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, u: &User, owner_id: i64) -> anyhow::Result<bool> {
        let res = UserEntity::update_many()
            .col_expr(Column::Email, Expr::value(u.email.clone()))
            .col_expr(Column::GivenName, Expr::value(u.given_name.clone()))
            .col_expr(Column::FamilyName, Expr::value(u.family_name.clone()))
            .col_expr(Column::UpdatedAt, Expr::value(u.updated_at))
            .filter(Column::Id.eq(u.id))
            .filter(Column::Id.eq(owner_id))
            .exec(&self.conn)
            .await
            .context("update failed")?;
        Ok(res.rows_affected == 1)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<bool> {
        let res = UserEntity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::Id.eq(owner_id))
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
