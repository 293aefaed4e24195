use std::time::Duration;

use async_trait::async_trait;

use crate::Result;
use crate::types::SearchQuery;

/// How long a cached search result stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Key-value store with expiring entries.
///
/// Implementations return [`CacheUnavailable`](crate::ImgcacheError::CacheUnavailable)
/// when the backing store cannot be reached. Callers are expected to treat
/// any error as a miss.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch a value. `None` when never set or when its TTL has elapsed.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any existing entry and resetting its TTL.
    ///
    /// A zero `ttl` is rejected with `InvalidInput`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

/// Derive the cache key for a query: `images:<text>-<page>`.
///
/// `per_page` is deliberately not part of the key, so requests that differ
/// only in page size share an entry until it expires.
pub fn cache_key(query: &SearchQuery) -> String {
    format!("images:{}-{}", query.text(), query.page())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format() {
        let query = SearchQuery::new("nature", 1, 8).unwrap();
        assert_eq!(cache_key(&query), "images:nature-1");
    }

    #[test]
    fn key_ignores_per_page() {
        let a = SearchQuery::new("cats", 2, 5).unwrap();
        let b = SearchQuery::new("cats", 2, 30).unwrap();
        assert_eq!(cache_key(&a), cache_key(&b));
    }

    #[test]
    fn key_differs_on_text_and_page() {
        let base = SearchQuery::new("cats", 2, 5).unwrap();
        let other_text = SearchQuery::new("dogs", 2, 5).unwrap();
        let other_page = SearchQuery::new("cats", 3, 5).unwrap();
        assert_ne!(cache_key(&base), cache_key(&other_text));
        assert_ne!(cache_key(&base), cache_key(&other_page));
    }

    #[test]
    fn key_keeps_text_verbatim() {
        let query = SearchQuery::new("Red Panda", 4, 8).unwrap();
        assert_eq!(cache_key(&query), "images:Red Panda-4");
    }
}
