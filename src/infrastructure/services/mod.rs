//! Infrastructure services

mod semantic_cache_service;

pub use semantic_cache_service::{SemanticCacheService, SemanticCacheServiceTrait};

#[cfg(test)]
pub use semantic_cache_service::MockSemanticCacheServiceTrait;
