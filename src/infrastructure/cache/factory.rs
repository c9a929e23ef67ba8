//! Cache factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::config::{CacheBackend, RedisConfig};
use crate::domain::cache::ResponseCache;
use crate::domain::DomainError;

use super::in_memory::InMemoryResponseCache;
use super::redis::RedisResponseCache;

/// Factory for creating response cache instances
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates the configured cache backend
    pub async fn create(
        &self,
        backend: CacheBackend,
        redis: &RedisConfig,
    ) -> Result<Arc<dyn ResponseCache>, DomainError> {
        match backend {
            CacheBackend::InMemory => {
                info!("Using in-memory response cache");
                Ok(Arc::new(InMemoryResponseCache::new()))
            }
            CacheBackend::Redis => {
                info!(
                    host = %redis.host,
                    port = redis.port,
                    db = redis.db,
                    "Connecting to Redis response cache"
                );
                let cache = RedisResponseCache::connect(redis).await?;
                Ok(Arc::new(cache))
            }
        }
    }
}
