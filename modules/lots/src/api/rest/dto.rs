use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::model::{Lot, LotPatch, NewLot};

/// REST DTO for lot representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotDto {
    pub id: i64,
    pub owner_id: i64,
    pub estate_type: String,
    pub rooms: i32,
    pub area: i32,
    pub floor: i32,
    pub max_floor: i32,
    pub city: String,
    pub district: String,
    pub street: String,
    pub building: String,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for publishing a lot; the owner is the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateLotReq {
    pub estate_type: String,
    pub rooms: i32,
    pub area: i32,
    pub floor: i32,
    pub max_floor: i32,
    pub city: String,
    pub district: String,
    pub street: String,
    pub building: String,
    pub price: i64,
}

/// REST DTO for updating a lot (partial)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateLotReq {
    pub price: Option<i64>,
    pub rooms: Option<i32>,
    pub area: Option<i32>,
}

// Conversion implementations between REST DTOs and contract models

impl From<Lot> for LotDto {
    fn from(lot: Lot) -> Self {
        Self {
            id: lot.id,
            owner_id: lot.owner_id,
            estate_type: lot.estate_type,
            rooms: lot.rooms,
            area: lot.area,
            floor: lot.floor,
            max_floor: lot.max_floor,
            city: lot.city,
            district: lot.district,
            street: lot.street,
            building: lot.building,
            price: lot.price,
            created_at: lot.created_at,
            updated_at: lot.updated_at,
        }
    }
}

impl CreateLotReq {
    pub fn into_new_lot(self, owner_id: i64) -> NewLot {
        NewLot {
            owner_id,
            estate_type: self.estate_type,
            rooms: self.rooms,
            area: self.area,
            floor: self.floor,
            max_floor: self.max_floor,
            city: self.city,
            district: self.district,
            street: self.street,
            building: self.building,
            price: self.price,
        }
    }
}

impl From<UpdateLotReq> for LotPatch {
    fn from(req: UpdateLotReq) -> Self {
        Self {
            price: req.price,
            rooms: req.rooms,
            area: req.area,
        }
    }
}
