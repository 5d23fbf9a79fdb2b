//! # Infrastructure Layer
//!
//! Concrete implementations behind the contracts defined in `cc_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: in-memory and Redis code storage backends
//! - **SMS**: SMS service trait, mock provider and the `sms` code sender
//! - **Email**: email transport trait, mock transport and the `email` code sender
//! - **Sender**: console sender and the default sender registry
//! - **Config**: layered configuration loading
//! - **Telemetry**: tracing subscriber setup
//!
//! ## Features
//!
//! - `redis-cache`: Enable the Redis storage backend (default)

use cc_core::errors::{DomainError, StorageError};

/// Cache module - code storage backends
pub mod cache;

/// Configuration loading
pub mod config;

/// Email delivery
pub mod email;

/// Code senders and sender registry
pub mod sender;

/// SMS delivery
pub mod sms;

/// Tracing subscriber setup
pub mod telemetry;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// Email service error
    #[error("Email service error: {0}")]
    Email(String),
}

impl From<::config::ConfigError> for InfrastructureError {
    fn from(error: ::config::ConfigError) -> Self {
        InfrastructureError::Config(error.to_string())
    }
}

impl From<InfrastructureError> for StorageError {
    fn from(error: InfrastructureError) -> Self {
        StorageError::backend(error.to_string())
    }
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Config(message) => DomainError::Internal { message },
            other => DomainError::Storage(other.into()),
        }
    }
}
