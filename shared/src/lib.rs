//! Shared utilities and common types for CheckCode
//!
//! This crate provides functionality used across the workspace:
//! - Configuration types (flows, storage, logging)
//! - Receiver utilities (phone and email validation, masking for logs)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, Environment, FlowPolicy, FlowSettings, LogFormat, LoggingConfig,
    StorageBackend, StorageConfig, TimeDisplay,
};
pub use utils::{phone, validation};
