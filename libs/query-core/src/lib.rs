//! Filter and sort grammar for listing endpoints.
//!
//! A raw query string goes through [`QueryParams`], then [`parse_filters`] and
//! [`SortSpecification::from_params`], and ends up as one [`QueryOptions`] value
//! that a storage adapter lowers into a predicate. Nothing in this crate knows
//! about HTTP or SQL.

pub mod error;
pub mod field;
pub mod filter;
pub mod operator;
pub mod options;
pub mod params;
pub mod sort;

pub use error::{QueryError, QueryResult};
pub use field::{FieldRegistry, FieldType};
pub use filter::{parse_filters, parse_value, FilterField, FilterSpecification, VALUE_SEPARATOR};
pub use operator::{Operator, OperatorRegistry};
pub use options::QueryOptions;
pub use params::QueryParams;
pub use sort::{SortOrder, SortSpecification, DEFAULT_SORT_FIELD, SORT_BY_PARAM, SORT_ORDER_PARAM};

#[cfg(test)]
mod tests;
