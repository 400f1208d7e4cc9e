//! Service-level errors
//!
//! Every service operation returns [`ServiceError`]. The API crate maps each
//! variant onto an HTTP status.

use thiserror::Error;
use uuid::Uuid;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::models::EntityKind;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing, malformed or mismatched input
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<validator::ValidationErrors>,
    },

    /// Duplicate unique field
    #[error("{0}")]
    Conflict(String),

    #[error("Cannot find {kind} '{id}'")]
    NotFound { kind: EntityKind, id: String },

    /// Bad credentials
    #[error("{0}")]
    Auth(String),

    /// Acting on another user's record
    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
        ServiceError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation {
            message: "Validation failed".to_string(),
            details: Some(errors),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(constraint) => {
                ServiceError::Conflict(format!("Duplicate value violates {}", constraint))
            }
            other => ServiceError::Store(other),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::from(StoreError::from_write(err))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_conflict_becomes_conflict() {
        let err = ServiceError::from(StoreError::Conflict("users_username_key".to_string()));
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = ServiceError::not_found(EntityKind::House, id);
        assert_eq!(
            err.to_string(),
            "Cannot find house '00000000-0000-0000-0000-000000000000'"
        );
    }
}
