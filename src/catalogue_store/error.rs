//! Error kinds surfaced by the catalogue store.
//!
//! Raw `rusqlite` errors are classified exactly once, when they cross the
//! store boundary, so callers can map a kind to a response without looking
//! at storage details.

use super::validation::ValidationErrors;
use rusqlite::ErrorCode;
use thiserror::Error;

pub type CatalogueResult<T> = Result<T, CatalogueError>;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Storage operation timed out: {0}")]
    Timeout(String),

    #[error("Internal storage error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CatalogueError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        CatalogueError::NotFound(format!("{} with id {} not found", entity, id))
    }

    pub fn invalid(field: &str, message: &str) -> Self {
        let mut errors = ValidationErrors::default();
        errors.add(field, message);
        CatalogueError::Validation(errors)
    }

    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogueError::Timeout(_))
    }
}

impl From<ValidationErrors> for CatalogueError {
    fn from(errors: ValidationErrors) -> Self {
        CatalogueError::Validation(errors)
    }
}

impl From<rusqlite::Error> for CatalogueError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err {
            let detail = message
                .clone()
                .unwrap_or_else(|| failure.to_string());
            match failure.code {
                ErrorCode::ConstraintViolation => {
                    return CatalogueError::ConstraintViolation(detail);
                }
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::OperationInterrupted => {
                    return CatalogueError::Timeout(detail);
                }
                _ => {}
            }
        }
        CatalogueError::Internal(err.into())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CatalogueError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        CatalogueError::Internal(anyhow::anyhow!("Connection mutex poisoned: {}", err))
    }
}
