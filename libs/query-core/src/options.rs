use std::collections::BTreeMap;

use crate::filter::{FilterField, FilterSpecification};
use crate::sort::SortSpecification;

/// Sort plus filters for one listing call. Built once, consumed by a
/// repository, then dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    sort: SortSpecification,
    filters: FilterSpecification,
}

impl QueryOptions {
    pub fn new(sort: SortSpecification, filters: FilterSpecification) -> Self {
        Self { sort, filters }
    }

    /// `"<field> <ASC|DESC>"`
    pub fn order_by_clause(&self) -> String {
        format!("{} {}", self.sort.field, self.sort.order)
    }

    pub fn filters_by_field(&self) -> &BTreeMap<String, Vec<FilterField>> {
        self.filters.fields()
    }

    pub fn sort(&self) -> &SortSpecification {
        &self.sort
    }

    pub fn filters(&self) -> &FilterSpecification {
        &self.filters
    }

    pub fn into_parts(self) -> (SortSpecification, FilterSpecification) {
        (self.sort, self.filters)
    }
}
