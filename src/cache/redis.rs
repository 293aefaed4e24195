//! Redis-backed cache store.
//!
//! The connection is established once, at startup. If redis is down at that
//! point the store is still built, in a disconnected state, and every
//! operation reports `CacheUnavailable` so searches fall through to the
//! provider. A multiplexed connection is cloned per operation; it
//! reconnects on its own once redis comes back.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tracing::{info, warn};

use super::CacheStore;
use crate::{ImgcacheError, Result};

/// Default redis URL.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Shared [`CacheStore`] on a redis server.
pub struct RedisStore {
    connection: Option<MultiplexedConnection>,
}

impl RedisStore {
    /// Connect to redis at `url`.
    ///
    /// Never fails: a connection error is logged and yields a store whose
    /// operations all return `CacheUnavailable`.
    pub async fn connect(url: &str) -> Self {
        match Self::try_connect(url).await {
            Ok(connection) => {
                info!(url, "connected to redis");
                Self {
                    connection: Some(connection),
                }
            }
            Err(e) => {
                warn!(url, error = %e, "failed to connect to redis, caching disabled");
                Self::disconnected()
            }
        }
    }

    /// A store with no connection; every operation is `CacheUnavailable`.
    pub fn disconnected() -> Self {
        Self { connection: None }
    }

    /// Whether the startup connection succeeded.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    async fn try_connect(url: &str) -> redis::RedisResult<MultiplexedConnection> {
        let client = redis::Client::open(url)?;
        client.get_multiplexed_async_connection().await
    }

    fn connection(&self) -> Result<MultiplexedConnection> {
        self.connection
            .clone()
            .ok_or_else(|| ImgcacheError::CacheUnavailable("redis is not connected".to_string()))
    }
}

impl From<redis::RedisError> for ImgcacheError {
    fn from(err: redis::RedisError) -> Self {
        ImgcacheError::CacheUnavailable(err.to_string())
    }
}

/// Redis TTLs are whole seconds; round up so an entry never expires early.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

#[async_trait]
impl CacheStore for RedisStore {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection()?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Err(ImgcacheError::InvalidInput(
                "cache TTL must be greater than zero".to_string(),
            ));
        }
        let mut conn = self.connection()?;
        let _: () = conn.set_ex(key, value, ttl_seconds(ttl)).await?;
        Ok(())
    }
}
