//! Semantic response caching service
//!
//! Joins the parser, the response store and the similarity index into the two
//! operations the proxy needs: look up a response for a conversation context
//! and record a freshly produced one.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::config::SemanticCacheConfig;
use crate::domain::{Context, DomainError, IndexClient, RequestParser, ResponseCache};

/// Semantic cache service backed by an id-keyed store and a similarity index
#[derive(Debug)]
pub struct SemanticCacheService {
    parser: Arc<dyn RequestParser>,
    cache: Arc<dyn ResponseCache>,
    index: Arc<dyn IndexClient>,
    config: SemanticCacheConfig,
}

impl SemanticCacheService {
    pub fn new(
        parser: Arc<dyn RequestParser>,
        cache: Arc<dyn ResponseCache>,
        index: Arc<dyn IndexClient>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            parser,
            cache,
            index,
            config,
        }
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Extract the conversation context from a raw request body
    pub fn parse(&self, body: &[u8]) -> Result<Context, DomainError> {
        self.parser.parse(body)
    }

    /// Look up a cached response for a context
    ///
    /// Index failures are returned to the caller. A store failure after a
    /// match is logged and reported as a miss.
    pub async fn get(&self, context: &Context) -> Result<Option<Bytes>, DomainError> {
        if context.is_empty() {
            return Ok(None);
        }

        let joined = context.joined();

        let found = match self.index.query_index(&joined, self.config.threshold).await? {
            Some(found) => found,
            None => {
                debug!(messages = context.len(), "Semantic cache miss");
                return Ok(None);
            }
        };

        if self.config.enforce_threshold && !found.is_within(self.config.threshold) {
            debug!(
                id = found.id,
                distance = found.distance,
                threshold = self.config.threshold,
                "Discarding index match beyond threshold"
            );
            return Ok(None);
        }

        match self.cache.get(found.id).await {
            Ok(Some(value)) => {
                debug!(id = found.id, distance = found.distance, "Semantic cache hit");
                Ok(Some(value))
            }
            Ok(None) => {
                warn!(id = found.id, "Index matched an id with no stored response");
                Ok(None)
            }
            Err(e) => {
                warn!(id = found.id, error = %e, "Failed to read cached response");
                Ok(None)
            }
        }
    }

    /// Store a response and index it under the context, returning the new id
    pub async fn save(&self, context: &Context, response: Bytes) -> Result<i64, DomainError> {
        let id = self.cache.save(response).await?;

        self.index.add_index(id, &context.joined()).await?;

        info!(id, messages = context.len(), "Cached upstream response");

        Ok(id)
    }

    /// Liveness of the backing store
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.cache.ping().await
    }
}

/// Trait for semantic cache service operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SemanticCacheServiceTrait: Send + Sync + std::fmt::Debug {
    fn parse(&self, body: &[u8]) -> Result<Context, DomainError>;

    async fn get(&self, context: &Context) -> Result<Option<Bytes>, DomainError>;

    async fn save(&self, context: &Context, response: Bytes) -> Result<i64, DomainError>;

    async fn ping(&self) -> Result<(), DomainError>;
}

#[async_trait]
impl SemanticCacheServiceTrait for SemanticCacheService {
    fn parse(&self, body: &[u8]) -> Result<Context, DomainError> {
        SemanticCacheService::parse(self, body)
    }

    async fn get(&self, context: &Context) -> Result<Option<Bytes>, DomainError> {
        SemanticCacheService::get(self, context).await
    }

    async fn save(&self, context: &Context, response: Bytes) -> Result<i64, DomainError> {
        SemanticCacheService::save(self, context, response).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        SemanticCacheService::ping(self).await
    }
}
