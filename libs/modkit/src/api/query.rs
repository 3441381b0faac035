//! Query-string extraction for list endpoints.
//!
//! The raw query string is kept as ordered `(name, value)` pairs so repeated
//! parameters survive. The sort inputs are resolved eagerly; filter fields
//! depend on the endpoint and are parsed later by the service.

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use query_core::{QueryError, QueryParams, SortSpecification};

use crate::api::problem::{Problem, ProblemResponse};

/// Map query-language errors to RFC 9457 Problem responses.
pub fn query_error_to_problem(e: &QueryError, instance: &str) -> ProblemResponse {
    let title = match e {
        QueryError::InvalidSortOrder(_) => "Invalid sort order",
        QueryError::TooManyFilters { .. } => "Too many filters",
    };
    Problem::new(StatusCode::BAD_REQUEST, title, e.to_string())
        .with_code("INVALID_QUERY")
        .with_instance(instance)
        .into()
}

/// Extractor for `GET` list endpoints.
///
/// Usage in handlers:
///   async fn list_lots(ListQuery { params, sort }: ListQuery, /* ... */) { /* ... */ }
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub params: QueryParams,
    pub sort: SortSpecification,
}

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = parts
            .uri
            .query()
            .map(QueryParams::parse)
            .unwrap_or_default();

        let sort = SortSpecification::from_params(&params)
            .map_err(|e| query_error_to_problem(&e, parts.uri.path()))?;

        Ok(ListQuery { params, sort })
    }
}
