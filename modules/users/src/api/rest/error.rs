use axum::http::StatusCode;
use modkit::api::problem::ProblemResponse;

use crate::domain::error::DomainError;

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { .. } | DomainError::UsernameNotFound { .. } => {
            ProblemResponse::from_parts(
                StatusCode::NOT_FOUND,
                "User not found",
                e.to_string(),
                "USERS_NOT_FOUND",
                instance,
            )
        }
        DomainError::EmailAlreadyExists { email } => ProblemResponse::from_parts(
            StatusCode::CONFLICT,
            "Email already exists",
            format!("Email '{}' is already in use", email),
            "CONFLICT",
            instance,
        ),
        DomainError::UsernameTaken { username } => ProblemResponse::from_parts(
            StatusCode::CONFLICT,
            "Username already taken",
            format!("Username '{}' is already taken", username),
            "CONFLICT",
            instance,
        ),
        DomainError::InvalidEmail { .. } | DomainError::Validation { .. } => {
            ProblemResponse::from_parts(
                StatusCode::BAD_REQUEST,
                "Validation error",
                e.to_string(),
                "VALIDATION",
                instance,
            )
        }
        DomainError::InvalidQuery { message } => ProblemResponse::from_parts(
            StatusCode::BAD_REQUEST,
            "Invalid query",
            message.clone(),
            "INVALID_QUERY",
            instance,
        ),
        DomainError::Database { .. } => {
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

pub fn parse_id(raw: &str, instance: &str) -> Result<i64, ProblemResponse> {
    raw.parse::<i64>().map_err(|_| {
        ProblemResponse::from_parts(
            StatusCode::BAD_REQUEST,
            "Validation error",
            format!("invalid user id '{}'", raw),
            "VALIDATION",
            instance,
        )
    })
}
