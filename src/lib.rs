//! Semantic cache proxy
//!
//! A cache-aside reverse proxy for OpenAI-style chat APIs. Requests whose
//! conversation is semantically close to one already answered are served from
//! the cache; everything else is forwarded upstream and the streamed response
//! is stored for next time.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    cache::CacheFactory, index::HttpIndexClient, parser::OpenAiChatParser,
    services::SemanticCacheService, upstream::HttpUpstreamClient,
};
use tracing::info;

/// Wire every component from one configuration snapshot
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache = CacheFactory::new()
        .create(config.cache.backend, &config.redis)
        .await?;

    let index = Arc::new(HttpIndexClient::from_config(&config.index)?);
    let parser = Arc::new(OpenAiChatParser::new());

    info!(
        backend = %config.cache.backend,
        threshold = config.cache.threshold,
        enforce_threshold = config.cache.enforce_threshold,
        index_url = %config.index.base_url,
        "Semantic cache configured"
    );

    let cache_service = Arc::new(SemanticCacheService::new(
        parser,
        cache,
        index,
        config.cache.clone(),
    ));

    let upstream = Arc::new(HttpUpstreamClient::from_config(&config.upstream)?);

    Ok(AppState::new(
        cache_service,
        upstream,
        Arc::new(config.clone()),
    ))
}
