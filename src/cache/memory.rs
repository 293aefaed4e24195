//! In-process cache store.
//!
//! Uses moka's async cache with a per-entry expiry policy: each `set`
//! carries its own TTL, an overwrite restarts the clock, and reads never
//! extend it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::CacheStore;
use crate::{ImgcacheError, Result};

/// Default maximum number of entries held in memory.
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Clone)]
struct StoredValue {
    value: String,
    ttl: Duration,
}

/// Expire each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded in-memory [`CacheStore`].
///
/// Never returns `CacheUnavailable`. When the capacity is exceeded, moka
/// evicts entries before their TTL, which callers observe as a miss.
pub struct MemoryStore {
    entries: Cache<String, StoredValue>,
}

impl MemoryStore {
    /// Create an empty store with the default capacity (10,000 entries).
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store with a custom capacity.
    pub fn with_max_entries(max: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max)
            .expire_after(PerEntryTtl)
            .build();
        Self { entries }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).await.map(|stored| stored.value))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Err(ImgcacheError::InvalidInput(
                "cache TTL must be greater than zero".to_string(),
            ));
        }
        self.entries
            .insert(key.to_string(), StoredValue { value, ttl })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn miss_then_hit() {
        let store = MemoryStore::new();
        assert_eq!(store.get("images:nature-1").await.unwrap(), None);

        store
            .set("images:nature-1", "[]".into(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            store.get("images:nature-1").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);
        store.set("k", "old".into(), ttl).await.unwrap();
        store.set("k", "new".into(), ttl).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn zero_ttl_rejected() {
        let store = MemoryStore::new();
        let err = store.set("k", "v".into(), Duration::ZERO).await;
        assert!(matches!(err, Err(ImgcacheError::InvalidInput(_))));
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
