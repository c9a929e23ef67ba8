//! Redis response cache implementation

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::config::RedisConfig;
use crate::domain::cache::{item_key, ResponseCache, ID_COUNTER_KEY};
use crate::domain::DomainError;

/// Redis-backed response cache
///
/// IDs come from `INCR` on a single well-known counter key, so allocation is
/// atomic across every proxy instance sharing the database. Values are stored
/// without expiry.
#[derive(Clone)]
pub struct RedisResponseCache {
    connection: ConnectionManager,
    address: String,
}

impl fmt::Debug for RedisResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisResponseCache")
            .field("address", &self.address)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisResponseCache {
    /// Connects to Redis using the configured address, credentials and database
    pub async fn connect(config: &RedisConfig) -> Result<Self, DomainError> {
        let url = config.url()?;

        let client = Client::open(url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self {
            connection,
            address: format!("{}:{}/{}", config.host, config.port, config.db),
        })
    }
}

#[async_trait]
impl ResponseCache for RedisResponseCache {
    async fn save(&self, value: Bytes) -> Result<i64, DomainError> {
        let mut conn = self.connection.clone();

        let id: i64 = conn.incr(ID_COUNTER_KEY, 1).await.map_err(|e| {
            DomainError::cache(format!("Failed to allocate item ID: {}", e))
        })?;

        let key = item_key(id);

        // The ID stays allocated if this fails; the gap is harmless
        let _: () = conn
            .set(&key, &value[..])
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Bytes>, DomainError> {
        let key = item_key(id);
        let mut conn = self.connection.clone();

        let value: Option<Vec<u8>> = conn
            .get(&key)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to get key '{}': {}", key, e)))?;

        Ok(value.map(Bytes::from))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to ping Redis: {}", e)))?;

        Ok(())
    }
}
