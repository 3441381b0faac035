use std::fmt;
use std::str::FromStr;

use crate::error::{QueryError, QueryResult};
use crate::params::QueryParams;

pub const DEFAULT_SORT_FIELD: &str = "created_at";
pub const SORT_BY_PARAM: &str = "sort_by";
pub const SORT_ORDER_PARAM: &str = "sort_order";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(QueryError::InvalidSortOrder(s.to_owned()))
        }
    }
}

/// Resolved ordering for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpecification {
    pub field: String,
    pub order: SortOrder,
}

impl Default for SortSpecification {
    fn default() -> Self {
        Self {
            field: DEFAULT_SORT_FIELD.to_owned(),
            order: SortOrder::default(),
        }
    }
}

impl SortSpecification {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Applies defaults to the two optional inputs.
    ///
    /// A missing or empty `sort_by` falls back to [`DEFAULT_SORT_FIELD`]; a missing
    /// or empty `sort_order` falls back to descending. Any other order token is
    /// rejected instead of being silently replaced.
    pub fn resolve(sort_by: Option<&str>, sort_order: Option<&str>) -> QueryResult<Self> {
        let field = match sort_by.map(str::trim) {
            Some(f) if !f.is_empty() => f.to_owned(),
            _ => DEFAULT_SORT_FIELD.to_owned(),
        };
        let order = match sort_order {
            Some(o) if !o.trim().is_empty() => o.parse()?,
            _ => SortOrder::default(),
        };
        Ok(Self { field, order })
    }

    pub fn from_params(params: &QueryParams) -> QueryResult<Self> {
        Self::resolve(params.get(SORT_BY_PARAM), params.get(SORT_ORDER_PARAM))
    }
}
