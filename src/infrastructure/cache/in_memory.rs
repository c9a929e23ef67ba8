//! In-memory response cache implementation using moka

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache as MokaCache;

use crate::domain::cache::ResponseCache;
use crate::domain::DomainError;

/// Process-local response cache
///
/// Mirrors the Redis layout: a single atomic counter hands out IDs starting
/// at 1 and entries never expire. State is lost on restart, so it suits local
/// runs and tests rather than shared deployments.
#[derive(Debug)]
pub struct InMemoryResponseCache {
    entries: MokaCache<i64, Bytes>,
    next_id: AtomicI64,
}

impl Default for InMemoryResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self {
            entries: MokaCache::builder().build(),
            next_id: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn save(&self, value: Bytes) -> Result<i64, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.entries.insert(id, value).await;

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Bytes>, DomainError> {
        Ok(self.entries.get(&id).await)
    }
}
