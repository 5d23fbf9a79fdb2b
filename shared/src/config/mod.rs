//! Configuration module with business-specific sub-modules
//!
//! - `cache` - storage backend selection and Redis configuration
//! - `environment` - environment detection and logging configuration
//! - `flow` - per-flow quota, cooldown, lifetime and template settings

pub mod cache;
pub mod environment;
pub mod flow;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::{CacheConfig, StorageBackend, StorageConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use flow::{FlowPolicy, FlowSettings, TimeDisplay};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Flow configuration
    #[serde(default)]
    pub flow: FlowSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
