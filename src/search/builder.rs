//! Builder for configuring search service instances

use std::sync::Arc;
use std::time::Duration;

use super::SearchService;
use super::single_flight::InFlight;
use crate::cache::{CacheStore, DEFAULT_TTL, MemoryStore};
use crate::providers::ImageSearchProvider;
use crate::{ImgcacheError, Result};

/// Builder for [`SearchService`].
///
/// Everything the orchestrator touches is passed in here, so tests can
/// substitute fake stores and providers.
pub struct SearchServiceBuilder {
    provider: Arc<dyn ImageSearchProvider>,
    cache: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
    single_flight: bool,
}

impl SearchServiceBuilder {
    pub fn new(provider: Arc<dyn ImageSearchProvider>) -> Self {
        Self {
            provider,
            cache: None,
            ttl: DEFAULT_TTL,
            single_flight: false,
        }
    }

    /// Use the given cache store (default: an in-memory [`MemoryStore`]).
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the TTL applied to freshly fetched results (default: 1 hour).
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Collapse concurrent misses for the same cache key into a single
    /// provider call (default: off).
    pub fn single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    pub fn build(self) -> Result<SearchService> {
        if self.ttl.is_zero() {
            return Err(ImgcacheError::Configuration(
                "cache TTL must be greater than zero".to_string(),
            ));
        }

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn CacheStore>);
        let in_flight = self.single_flight.then(InFlight::new);

        Ok(SearchService::new(
            cache,
            self.provider,
            self.ttl,
            in_flight,
        ))
    }
}
