//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheBackend, IndexConfig, LogFormat, LoggingConfig, RedisConfig,
    SemanticCacheConfig, ServerConfig, UpstreamConfig,
};
