//! Code storage backends
//!
//! Both backends implement [`CodeStorage`] with the same guarantees: a code is
//! written together with its error count and issue time in one step, and counters
//! only move while their record exists.

pub mod memory_storage;
#[cfg(feature = "redis-cache")]
pub mod redis_client;
#[cfg(feature = "redis-cache")]
pub mod redis_storage;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use cc_core::domain::Clock;
use cc_core::services::CodeStorage;
use cc_shared::config::{StorageBackend, StorageConfig};

use crate::InfrastructureError;

pub use memory_storage::MemoryCodeStorage;
#[cfg(feature = "redis-cache")]
pub use redis_client::RedisClient;
#[cfg(feature = "redis-cache")]
pub use redis_storage::RedisCodeStorage;

// Re-export commonly used types
pub use cc_shared::config::CacheConfig;

/// Create the storage backend selected by configuration
pub async fn create_code_storage(
    config: &StorageConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn CodeStorage>, InfrastructureError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!(backend = "memory", "Using in-memory code storage");
            Ok(Arc::new(MemoryCodeStorage::with_clock(clock)))
        }
        #[cfg(feature = "redis-cache")]
        StorageBackend::Redis => {
            tracing::info!(backend = "redis", "Using Redis code storage");
            let client = RedisClient::new(config.redis.clone()).await?;
            Ok(Arc::new(RedisCodeStorage::with_clock(client, clock)))
        }
        #[cfg(not(feature = "redis-cache"))]
        StorageBackend::Redis => Err(InfrastructureError::Config(
            "Redis storage requested but the redis-cache feature is disabled".to_string(),
        )),
    }
}
