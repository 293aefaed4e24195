//! SearchService - the cache-aside request path

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{Instrument, debug, instrument, warn};

use super::SearchServiceBuilder;
use super::single_flight::InFlight;
use crate::cache::{CacheStore, cache_key};
use crate::providers::ImageSearchProvider;
use crate::telemetry;
use crate::types::{RawSearchParams, SearchQuery, SearchResult};
use crate::{ImgcacheError, Result};

/// Cache-aside coordinator in front of an [`ImageSearchProvider`].
///
/// For each query: look the key up in the [`CacheStore`]; on a hit, return
/// it as-is (no TTL refresh). On a miss, or when the store is unavailable,
/// ask the provider, write the result back with the configured TTL, and
/// return it. Cache failures are logged and never reach the caller.
///
/// The provider call and the cache write run on a spawned task, so they
/// complete even if the caller stops waiting.
pub struct SearchService {
    cache: Arc<dyn CacheStore>,
    provider: Arc<dyn ImageSearchProvider>,
    ttl: Duration,
    in_flight: Option<InFlight>,
}

impl SearchService {
    pub(crate) fn new(
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn ImageSearchProvider>,
        ttl: Duration,
        in_flight: Option<InFlight>,
    ) -> Self {
        Self {
            cache,
            provider,
            ttl,
            in_flight,
        }
    }

    /// Create a builder around the given provider.
    pub fn builder(provider: Arc<dyn ImageSearchProvider>) -> SearchServiceBuilder {
        SearchServiceBuilder::new(provider)
    }

    /// TTL applied to cache writes.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Validate raw parameters, then [`search`](Self::search).
    pub async fn handle(&self, raw: &RawSearchParams) -> Result<SearchResult> {
        let query = SearchQuery::validate(raw)?;
        self.search(&query).await
    }

    /// Run a validated query through the cache.
    #[instrument(skip(self), fields(key = tracing::field::Empty))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let key = cache_key(query);
        tracing::Span::current().record("key", key.as_str());

        if let Some(images) = self.lookup(&key).await {
            metrics::counter!(telemetry::SEARCHES_TOTAL, "status" => "ok").increment(1);
            return Ok(images);
        }

        let fetch = self.fetch_task(query.clone(), key.clone());
        let result = match &self.in_flight {
            Some(in_flight) => in_flight.run(&key, fetch).await,
            None => fetch.await,
        };

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::SEARCHES_TOTAL, "status" => status).increment(1);
        result
    }

    /// Cache lookup. Every failure mode (store down, undecodable entry)
    /// degrades to a miss.
    async fn lookup(&self, key: &str) -> Option<SearchResult> {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                return None;
            }
            Err(e) => {
                warn!(store = self.cache.name(), error = %e, "cache lookup failed, falling back to provider");
                metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "operation" => "get").increment(1);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                return None;
            }
        };

        match serde_json::from_str::<SearchResult>(&raw) {
            Ok(images) => {
                debug!(count = images.len(), "cache hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(images)
            }
            Err(e) => {
                warn!(error = %e, "discarding undecodable cache entry");
                metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "operation" => "decode")
                    .increment(1);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Build the provider-fetch-then-cache-write future. Nothing runs until
    /// it is first polled.
    fn fetch_task(
        &self,
        query: SearchQuery,
        key: String,
    ) -> impl Future<Output = Result<SearchResult>> + Send + 'static {
        let cache = Arc::clone(&self.cache);
        let provider = Arc::clone(&self.provider);
        let ttl = self.ttl;

        async move {
            let task = fetch_and_store(provider, cache, query, key, ttl).in_current_span();
            tokio::spawn(task)
                .await
                .map_err(|e| ImgcacheError::Internal(format!("search task failed: {e}")))?
        }
    }
}

async fn fetch_and_store(
    provider: Arc<dyn ImageSearchProvider>,
    cache: Arc<dyn CacheStore>,
    query: SearchQuery,
    key: String,
    ttl: Duration,
) -> Result<SearchResult> {
    let provider_name = provider.name().to_string();
    let start = Instant::now();
    let outcome = provider.search(&query).await;

    metrics::histogram!(
        telemetry::PROVIDER_DURATION_SECONDS,
        "provider" => provider_name.clone()
    )
    .record(start.elapsed().as_secs_f64());
    let status = if outcome.is_ok() { "ok" } else { "error" };
    metrics::counter!(
        telemetry::PROVIDER_REQUESTS_TOTAL,
        "provider" => provider_name.clone(),
        "status" => status
    )
    .increment(1);

    let images = outcome?;
    debug!(provider = %provider_name, count = images.len(), "fetched from provider");

    match serde_json::to_string(&images) {
        Ok(json) => {
            if let Err(e) = cache.set(&key, json, ttl).await {
                warn!(store = cache.name(), error = %e, "failed to write search result to cache");
                metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "operation" => "set")
                    .increment(1);
            }
        }
        Err(e) => warn!(error = %e, "failed to serialize search result for cache"),
    }

    Ok(images)
}
