#![allow(dead_code)]

use modkit_db::filter::FieldMap;
use query_core::FieldType;

pub mod listing {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "listings")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub district: String,
        pub price: i64,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub fn listing_fields() -> FieldMap<listing::Entity> {
    FieldMap::<listing::Entity>::new()
        .insert("district", listing::Column::District, FieldType::String)
        .insert("price", listing::Column::Price, FieldType::Integer)
        .insert("created_at", listing::Column::CreatedAt, FieldType::Date)
        .insert_sort_only("id", listing::Column::Id, FieldType::Integer)
        .with_tiebreaker("id")
}
