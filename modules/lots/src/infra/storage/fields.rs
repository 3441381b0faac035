//! Listing surface of the `lots` table: which API names may be filtered or
//! sorted on, and the column and type behind each.

use modkit_db::filter::FieldMap;
use query_core::FieldType;

use crate::infra::storage::entity::{Column, Entity};

pub fn lot_field_map() -> FieldMap<Entity> {
    FieldMap::new()
        .insert("estate_type", Column::EstateType, FieldType::String)
        .insert("rooms", Column::Rooms, FieldType::Integer)
        .insert("district", Column::District, FieldType::String)
        .insert("price", Column::Price, FieldType::Integer)
        .insert("created_at", Column::CreatedAt, FieldType::Date)
        .insert("floor", Column::Floor, FieldType::Integer)
        .insert_sort_only("id", Column::Id, FieldType::Integer)
        .insert_sort_only("updated_at", Column::UpdatedAt, FieldType::Date)
        .with_tiebreaker("id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_registry_excludes_sort_only_fields() {
        let reg = lot_field_map().filter_registry();
        assert_eq!(reg.len(), 6);
        assert_eq!(reg.declared_type("price"), Some(FieldType::Integer));
        assert_eq!(reg.declared_type("created_at"), Some(FieldType::Date));
        assert!(!reg.contains("id"));
        assert!(!reg.contains("updated_at"));
        assert!(!reg.contains("owner_id"));
    }

    #[test]
    fn sort_only_fields_are_resolvable() {
        let map = lot_field_map();
        assert!(map.get("id").is_some());
        assert!(map.get("updated_at").is_some());
        assert!(map.get("street").is_none());
    }
}
