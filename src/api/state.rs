//! Application state for shared services

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::UpstreamClient;
use crate::infrastructure::services::SemanticCacheServiceTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub cache_service: Arc<dyn SemanticCacheServiceTrait>,
    pub upstream: Arc<dyn UpstreamClient>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        cache_service: Arc<dyn SemanticCacheServiceTrait>,
        upstream: Arc<dyn UpstreamClient>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            cache_service,
            upstream,
            config,
        }
    }
}
