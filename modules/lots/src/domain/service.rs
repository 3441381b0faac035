use std::sync::Arc;

use chrono::Utc;
use query_core::{
    parse_filters, FieldRegistry, OperatorRegistry, QueryOptions, QueryParams, SortSpecification,
};
use tracing::{debug, error, info, instrument};

use crate::contract::model::{EstateType, Lot, LotPatch, NewLot};
use crate::domain::error::DomainError;
use crate::domain::repo::{LotsRepository, RepoError};

pub const MIN_ROOMS: i32 = 0;
pub const MAX_ROOMS: i32 = 6;
pub const MIN_FLOOR: i32 = 1;
pub const MAX_FLOOR: i32 = 163;

/// Domain service with business rules for lot management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn LotsRepository>,
    fields: FieldRegistry,
    operators: OperatorRegistry,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_filter_atoms: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_filter_atoms: 64,
        }
    }
}

impl Service {
    /// `fields` is the filter allow-list for lots, normally taken from the
    /// storage field map so parser and lowering agree.
    pub fn new(repo: Arc<dyn LotsRepository>, fields: FieldRegistry, config: ServiceConfig) -> Self {
        Self {
            repo,
            fields,
            operators: OperatorRegistry::standard(),
            config,
        }
    }

    pub fn with_operators(mut self, operators: OperatorRegistry) -> Self {
        self.operators = operators;
        self
    }

    #[instrument(
        name = "lots.service.create_lot",
        skip(self, new_lot),
        fields(owner_id = new_lot.owner_id, district = %new_lot.district)
    )]
    pub async fn create_lot(&self, new_lot: NewLot) -> Result<Lot, DomainError> {
        info!("Creating new lot");

        validate_new_lot(&new_lot)?;

        let lot = self
            .repo
            .create(new_lot, Utc::now())
            .await
            .map_err(|e| database_error("create", e))?;

        info!(lot_id = lot.id, "Successfully created lot");
        Ok(lot)
    }

    #[instrument(name = "lots.service.get_lot", skip(self), fields(lot_id = id))]
    pub async fn get_lot(&self, id: i64) -> Result<Lot, DomainError> {
        debug!("Getting lot by id");

        let lot = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| database_error("find_by_id", e))?
            .ok_or_else(|| DomainError::lot_not_found(id))?;
        debug!("Successfully retrieved lot");
        Ok(lot)
    }

    #[instrument(name = "lots.service.list_lots_by_owner", skip(self))]
    pub async fn list_lots_by_owner(&self, owner_id: i64) -> Result<Vec<Lot>, DomainError> {
        debug!("Listing lots of owner");

        let lots = self
            .repo
            .find_by_owner(owner_id)
            .await
            .map_err(|e| database_error("find_by_owner", e))?;
        debug!(count = lots.len(), "Listed lots of owner");
        Ok(lots)
    }

    /// Filtered listing. Unknown parameters are ignored; a bad sort field or a
    /// value that does not fit its field type is rejected before the store is hit.
    #[instrument(
        name = "lots.service.list_lots",
        skip(self, params),
        fields(sort = %sort.field, order = %sort.order.as_str())
    )]
    pub async fn list_lots(
        &self,
        params: &QueryParams,
        sort: SortSpecification,
    ) -> Result<Vec<Lot>, DomainError> {
        let filters = parse_filters(params, &self.fields, &self.operators);
        filters
            .ensure_within(self.config.max_filter_atoms)
            .map_err(|e| DomainError::invalid_query(e.to_string()))?;
        debug!(atoms = filters.atom_count(), "Parsed lot filters");

        let opts = QueryOptions::new(sort, filters);
        let lots = self
            .repo
            .find_with_options(&opts)
            .await
            .map_err(|e| match e {
                RepoError::Query(e) => DomainError::invalid_query(e.to_string()),
                RepoError::Db(e) => database_error("find_with_options", e),
            })?;

        debug!(count = lots.len(), "Listed lots");
        Ok(lots)
    }

    #[instrument(name = "lots.service.update_lot", skip(self, patch), fields(lot_id = id))]
    pub async fn update_lot(
        &self,
        owner_id: i64,
        id: i64,
        patch: LotPatch,
    ) -> Result<Lot, DomainError> {
        info!("Updating lot");

        let mut current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| database_error("find_by_id", e))?
            .ok_or_else(|| DomainError::lot_not_found(id))?;

        // Someone else's lot looks exactly like a missing one.
        if current.owner_id != owner_id {
            debug!("Lot belongs to another owner");
            return Err(DomainError::lot_not_found(id));
        }

        if let Some(price) = patch.price {
            current.price = price;
        }
        if let Some(rooms) = patch.rooms {
            current.rooms = rooms;
        }
        if let Some(area) = patch.area {
            current.area = area;
        }
        validate_numbers(current.rooms, current.area, current.price)?;
        current.updated_at = Utc::now();

        let updated = self
            .repo
            .update(&current)
            .await
            .map_err(|e| database_error("update", e))?;
        if !updated {
            return Err(DomainError::lot_not_found(id));
        }

        info!("Successfully updated lot");
        Ok(current)
    }

    #[instrument(name = "lots.service.delete_lot", skip(self), fields(lot_id = id))]
    pub async fn delete_lot(&self, owner_id: i64, id: i64) -> Result<(), DomainError> {
        info!("Deleting lot");

        let deleted = self
            .repo
            .delete(id, owner_id)
            .await
            .map_err(|e| database_error("delete", e))?;

        if !deleted {
            return Err(DomainError::lot_not_found(id));
        }

        info!("Successfully deleted lot");
        Ok(())
    }
}

fn database_error(op: &str, e: anyhow::Error) -> DomainError {
    error!(operation = op, error = ?e, "lots repository failure");
    DomainError::database(e.to_string())
}

fn validate_new_lot(lot: &NewLot) -> Result<(), DomainError> {
    if lot.owner_id <= 0 {
        return Err(DomainError::validation("owner_id", "must be positive"));
    }
    lot.estate_type
        .parse::<EstateType>()
        .map_err(|e| DomainError::validation("estate_type", e))?;
    validate_numbers(lot.rooms, lot.area, lot.price)?;

    if !(MIN_FLOOR..=MAX_FLOOR).contains(&lot.floor) {
        return Err(DomainError::validation(
            "floor",
            format!("must be between {MIN_FLOOR} and {MAX_FLOOR}"),
        ));
    }
    if !(MIN_FLOOR..=MAX_FLOOR).contains(&lot.max_floor) {
        return Err(DomainError::validation(
            "max_floor",
            format!("must be between {MIN_FLOOR} and {MAX_FLOOR}"),
        ));
    }
    if lot.floor > lot.max_floor {
        return Err(DomainError::validation("floor", "cannot be above max_floor"));
    }

    for (field, value) in [
        ("city", &lot.city),
        ("district", &lot.district),
        ("street", &lot.street),
        ("building", &lot.building),
    ] {
        if value.trim().is_empty() {
            return Err(DomainError::validation(field, "cannot be empty"));
        }
    }
    Ok(())
}

fn validate_numbers(rooms: i32, area: i32, price: i64) -> Result<(), DomainError> {
    if !(MIN_ROOMS..=MAX_ROOMS).contains(&rooms) {
        return Err(DomainError::validation(
            "rooms",
            format!("must be between {MIN_ROOMS} and {MAX_ROOMS}"),
        ));
    }
    if area <= 0 {
        return Err(DomainError::validation("area", "must be positive"));
    }
    if price <= 0 {
        return Err(DomainError::validation("price", "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_lot() -> NewLot {
        NewLot {
            owner_id: 1,
            estate_type: "apartment".into(),
            rooms: 2,
            area: 54,
            floor: 3,
            max_floor: 9,
            city: "Riga".into(),
            district: "North".into(),
            street: "Brivibas".into(),
            building: "12".into(),
            price: 100,
        }
    }

    #[test]
    fn valid_lot_passes() {
        assert!(validate_new_lot(&new_lot()).is_ok());
    }

    fn expect_invalid(field: &str, mutate: impl FnOnce(&mut NewLot)) {
        let mut lot = new_lot();
        mutate(&mut lot);
        match validate_new_lot(&lot) {
            Err(DomainError::Validation { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected validation error on {field}, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_attributes() {
        expect_invalid("rooms", |l| l.rooms = 7);
        expect_invalid("rooms", |l| l.rooms = -1);
        expect_invalid("area", |l| l.area = 0);
        expect_invalid("price", |l| l.price = 0);
        expect_invalid("floor", |l| l.floor = 0);
        expect_invalid("max_floor", |l| l.max_floor = 164);
        expect_invalid("floor", |l| l.floor = 10);
        expect_invalid("estate_type", |l| l.estate_type = "castle".into());
        expect_invalid("building", |l| l.building = "  ".into());
    }

    #[test]
    fn studio_with_zero_rooms_is_allowed() {
        let mut lot = new_lot();
        lot.rooms = 0;
        assert!(validate_new_lot(&lot).is_ok());
    }
}
