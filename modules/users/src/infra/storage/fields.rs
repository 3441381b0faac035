use modkit_db::filter::FieldMap;
use query_core::FieldType;

use crate::infra::storage::entity::{Column, Entity};

/// Filterable/sortable surface of the `users` table.
pub fn user_field_map() -> FieldMap<Entity> {
    FieldMap::new()
        .insert("username", Column::Username, FieldType::String)
        .insert("email", Column::Email, FieldType::String)
        .insert("given_name", Column::GivenName, FieldType::String)
        .insert("family_name", Column::FamilyName, FieldType::String)
        .insert("created_at", Column::CreatedAt, FieldType::Date)
        .insert_sort_only("id", Column::Id, FieldType::Integer)
        .insert_sort_only("updated_at", Column::UpdatedAt, FieldType::Date)
        .with_tiebreaker("id")
}
