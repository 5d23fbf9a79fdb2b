//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{ConfigError, StorageError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Whether the caller may retry the same call
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
