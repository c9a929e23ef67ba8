use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::DomainError;
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
///
/// Built once at startup and handed to every component constructor; nothing
/// reads configuration after that.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    #[validate(nested)]
    pub redis: RedisConfig,
    #[serde(default)]
    #[validate(nested)]
    pub index: IndexConfig,
    #[serde(default)]
    #[validate(nested)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    #[validate(nested)]
    pub cache: SemanticCacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest request body buffered for replay
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Key-value store connection settings
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RedisConfig {
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub db: i64,
}

/// Similarity-index service settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct IndexConfig {
    #[validate(url)]
    pub base_url: String,
    /// Request timeout; unset means the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Upstream LLM API settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpstreamConfig {
    #[validate(url)]
    pub target_url: String,
    /// Request timeout; unset means the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Which store backs the response cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    Redis,
    #[serde(alias = "memory")]
    InMemory,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackend::Redis => write!(f, "redis"),
            CacheBackend::InMemory => write!(f, "in_memory"),
        }
    }
}

/// Semantic cache behaviour
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SemanticCacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Maximum distance the index service may accept as a match
    #[serde(default = "default_threshold")]
    #[validate(range(min = 0.0, max = 2.0))]
    pub threshold: f32,

    /// Discard matches whose distance exceeds `threshold` instead of trusting
    /// the index service's decision
    #[serde(default)]
    pub enforce_threshold: bool,

    /// Also cache upstream responses with a non-2xx status
    #[serde(default)]
    pub cache_error_responses: bool,

    /// Content-Type sent with a cached response
    #[serde(default = "default_hit_content_type")]
    pub hit_content_type: String,

    /// Content-Encoding (and Accept-Encoding) sent with a cached response;
    /// empty disables both headers
    #[serde(default = "default_hit_content_encoding")]
    pub hit_content_encoding: Option<String>,
}

fn default_max_body_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_threshold() -> f32 {
    0.2
}

fn default_hit_content_type() -> String {
    "application/json".to_string()
}

fn default_hit_content_encoding() -> Option<String> {
    Some("gzip".to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: 0,
        }
    }
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("db", &self.db)
            .finish()
    }
}

impl RedisConfig {
    /// Connection URL in the form `redis://[:password@]host:port/db`
    pub fn url(&self) -> Result<String, DomainError> {
        let mut url = reqwest::Url::parse(&format!(
            "redis://{}:{}/{}",
            self.host, self.port, self.db
        ))
        .map_err(|e| DomainError::configuration(format!("Invalid Redis address: {}", e)))?;

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            url.set_password(Some(password))
                .map_err(|_| DomainError::configuration("Redis password cannot be set on URL"))?;
        }

        Ok(url.to_string())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            threshold: default_threshold(),
            enforce_threshold: false,
            cache_error_responses: false,
            hit_content_type: default_hit_content_type(),
            hit_content_encoding: default_hit_content_encoding(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Rejects settings the proxy cannot run with
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::configuration(e.to_string()))?;
        self.redis.url()?;

        Ok(())
    }

    /// Copy safe to print: credentials are masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();

        if config.redis.password.is_some() {
            config.redis.password = Some("[REDACTED]".to_string());
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.threshold, 0.2);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert!(!config.cache.enforce_threshold);
        assert_eq!(config.index.base_url, "http://localhost:8000");
        assert_eq!(config.upstream.target_url, "https://api.openai.com/v1");
        assert_eq!(config.redis.host, "127.0.0.1");
        assert_eq!(config.redis.port, 6379);
        assert_eq!(config.redis.db, 0);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_redis_url_without_password() {
        let redis = RedisConfig::default();
        assert_eq!(redis.url().unwrap(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn test_redis_url_with_password_is_encoded() {
        let redis = RedisConfig {
            host: "cache.internal".to_string(),
            port: 6380,
            password: Some("p@ss word".to_string()),
            db: 2,
        };

        let url = redis.url().unwrap();
        assert!(url.starts_with("redis://:"));
        assert!(url.ends_with("@cache.internal:6380/2"));
        assert!(!url.contains("p@ss word"));
    }

    #[test]
    fn test_check_rejects_invalid_threshold() {
        let mut config = AppConfig::default();
        config.cache.threshold = -0.5;

        let err = config.check().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_check_rejects_invalid_target_url() {
        let mut config = AppConfig::default();
        config.upstream.target_url = "not a url".to_string();

        assert!(config.check().is_err());
    }

    #[test]
    fn test_redacted_masks_password() {
        let mut config = AppConfig::default();
        config.redis.password = Some("hunter2".to_string());

        let printed = serde_json::to_string(&config.redacted()).unwrap();
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"port": 9000}, "cache": {"threshold": 0.35}, "redis": {"password": "pw"}}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cache.threshold, 0.35);
        assert_eq!(config.cache.hit_content_encoding.as_deref(), Some("gzip"));
        assert_eq!(config.redis.port, 6379);
        assert_eq!(config.redis.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_backend_deserializes_memory_alias() {
        let backend: CacheBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, CacheBackend::InMemory);

        let backend: CacheBackend = serde_json::from_str("\"in_memory\"").unwrap();
        assert_eq!(backend, CacheBackend::InMemory);
    }
}
