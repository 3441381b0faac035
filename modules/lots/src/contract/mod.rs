pub mod client;
pub mod error;
pub mod model;

pub use client::LotsApi;
pub use error::LotsError;
pub use model::{EstateType, Lot, LotPatch, NewLot};
