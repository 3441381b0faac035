#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid sort_order '{0}': expected ASC or DESC")]
    InvalidSortOrder(String),

    #[error("too many filter conditions: {count} (max {max})")]
    TooManyFilters { count: usize, max: usize },
}

pub type QueryResult<T> = Result<T, QueryError>;
