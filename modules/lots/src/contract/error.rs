use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LotsError {
    #[error("Lot not found: {id}")]
    NotFound { id: i64 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl LotsError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for LotsError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            LotNotFound { id } => Self::not_found(id),
            Validation { field, message } => Self::validation(format!("{}: {}", field, message)),
            InvalidQuery { message } => Self::validation(message),
            Database { .. } => Self::internal(),
        }
    }
}
