//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it works with a `DatabaseConnection`
//! or a transaction. Listing goes through the shared lowering engine with the
//! lot [`FieldMap`]; every filter value is bound, never spliced into SQL.

use anyhow::Context;
use chrono::{DateTime, Utc};
use modkit_db::filter::{FieldMap, QueryOptionsExt};
use query_core::QueryOptions;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::contract::model::{Lot, NewLot};
use crate::domain::repo::{LotsRepository, RepoError};
use crate::infra::storage::entity::{ActiveModel as LotAM, Column, Entity as LotEntity};
use crate::infra::storage::fields::lot_field_map;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmLotsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    fields: FieldMap<LotEntity>,
}

impl<C> SeaOrmLotsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            fields: lot_field_map(),
        }
    }
}

#[async_trait::async_trait]
impl<C> LotsRepository for SeaOrmLotsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create(&self, n: NewLot, at: DateTime<Utc>) -> anyhow::Result<Lot> {
        let m = LotAM {
            id: NotSet,
            owner_id: Set(n.owner_id),
            estate_type: Set(n.estate_type),
            rooms: Set(n.rooms),
            area: Set(n.area),
            floor: Set(n.floor),
            max_floor: Set(n.max_floor),
            city: Set(n.city),
            district: Set(n.district),
            street: Set(n.street),
            building: Set(n.building),
            price: Set(n.price),
            created_at: Set(at),
            updated_at: Set(at),
        };
        let inserted = m.insert(&self.conn).await.context("insert failed")?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Lot>> {
        let found = LotEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Lot>> {
        let rows = LotEntity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.conn)
            .await
            .context("find_by_owner failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_with_options(&self, opts: &QueryOptions) -> Result<Vec<Lot>, RepoError> {
        let query = LotEntity::find().apply_query_options(opts, &self.fields)?;
        let rows = query
            .all(&self.conn)
            .await
            .context("find_with_options failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, lot: &Lot) -> anyhow::Result<bool> {
        let res = LotEntity::update_many()
            .col_expr(Column::Price, Expr::value(lot.price))
            .col_expr(Column::Rooms, Expr::value(lot.rooms))
            .col_expr(Column::Area, Expr::value(lot.area))
            .col_expr(Column::UpdatedAt, Expr::value(lot.updated_at))
            .filter(Column::Id.eq(lot.id))
            .filter(Column::OwnerId.eq(lot.owner_id))
            .exec(&self.conn)
            .await
            .context("update failed")?;
        Ok(res.rows_affected == 1)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<bool> {
        let res = LotEntity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::OwnerId.eq(owner_id))
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
