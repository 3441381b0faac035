use crate::contract::model::Lot;
use crate::infra::storage::entity::Model as LotEntity;

/// Convert a database entity to a contract model
pub fn entity_to_contract(entity: LotEntity) -> Lot {
    Lot {
        id: entity.id,
        owner_id: entity.owner_id,
        estate_type: entity.estate_type,
        rooms: entity.rooms,
        area: entity.area,
        floor: entity.floor,
        max_floor: entity.max_floor,
        city: entity.city,
        district: entity.district,
        street: entity.street,
        building: entity.building,
        price: entity.price,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

impl From<LotEntity> for Lot {
    fn from(entity: LotEntity) -> Self {
        entity_to_contract(entity)
    }
}
