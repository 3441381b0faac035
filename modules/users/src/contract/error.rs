use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersError {
    #[error("User not found: {key}")]
    NotFound { key: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl UsersError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
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

impl From<crate::domain::error::DomainError> for UsersError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found(id.to_string()),
            UsernameNotFound { username } => Self::not_found(username),
            EmailAlreadyExists { email } => {
                Self::conflict(format!("email '{}' is already in use", email))
            }
            UsernameTaken { username } => {
                Self::conflict(format!("username '{}' is already taken", username))
            }
            InvalidEmail { email } => Self::validation(format!("Invalid email: {}", email)),
            Validation { field, message } => Self::validation(format!("{}: {}", field, message)),
            InvalidQuery { message } => Self::validation(message),
            Database { .. } => Self::internal(),
        }
    }
}
