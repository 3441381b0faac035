use axum::http::StatusCode;
use modkit::api::problem::ProblemResponse;

use crate::domain::error::DomainError;

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::LotNotFound { id } => ProblemResponse::from_parts(
            StatusCode::NOT_FOUND,
            "Lot not found",
            format!("Lot with id {} was not found", id),
            "LOTS_NOT_FOUND",
            instance,
        ),
        DomainError::Validation { .. } => ProblemResponse::from_parts(
            StatusCode::BAD_REQUEST,
            "Validation error",
            format!("{}", e),
            "VALIDATION",
            instance,
        ),
        DomainError::InvalidQuery { message } => ProblemResponse::from_parts(
            StatusCode::BAD_REQUEST,
            "Invalid query",
            message.clone(),
            "INVALID_QUERY",
            instance,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            ProblemResponse::from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                "An internal database error occurred",
                "INTERNAL",
                instance,
            )
        }
    }
}

/// Path ids are taken as strings so a malformed one becomes a problem
/// response rather than axum's plain-text rejection.
pub fn parse_id(raw: &str, instance: &str) -> Result<i64, ProblemResponse> {
    raw.parse::<i64>().map_err(|_| {
        ProblemResponse::from_parts(
            StatusCode::BAD_REQUEST,
            "Validation error",
            format!("invalid id '{}'", raw),
            "VALIDATION",
            instance,
        )
    })
}
