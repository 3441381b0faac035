use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Kind of property on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstateType {
    Apartment,
    House,
}

impl EstateType {
    pub fn as_str(self) -> &'static str {
        match self {
            EstateType::Apartment => "apartment",
            EstateType::House => "house",
        }
    }
}

impl fmt::Display for EstateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apartment" => Ok(EstateType::Apartment),
            "house" => Ok(EstateType::House),
            other => Err(format!("unknown estate type '{other}'")),
        }
    }
}

/// Pure lot model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lot {
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

/// Data for creating a new lot. The owner comes from the caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLot {
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
}

/// The only attributes a lot owner may change after publishing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LotPatch {
    pub price: Option<i64>,
    pub rooms: Option<i32>,
    pub area: Option<i32>,
}

impl LotPatch {
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.rooms.is_none() && self.area.is_none()
    }
}
