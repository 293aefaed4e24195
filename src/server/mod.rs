//! HTTP server.
//!
//! This module provides:
//! - The axum router and shared state (`router`, `AppState`)
//! - Request handlers (`service`)
//! - Error to HTTP response mapping (`convert`)
//! - The per-client rate limiting middleware (`middleware`)
//! - Configuration types (`config`)

pub mod config;
pub mod convert;
pub mod middleware;
pub mod service;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::cache::{CacheStore, MemoryStore};
use crate::providers::ImageSearchProvider;
use crate::{ClientRateLimiter, Result, SearchService};
use config::{CacheBackend, Config, Secrets};

pub use convert::ApiError;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub limiter: Arc<ClientRateLimiter>,
}

impl AppState {
    pub fn new(search: SearchService, limiter: ClientRateLimiter) -> Self {
        Self {
            search: Arc::new(search),
            limiter: Arc::new(limiter),
        }
    }

    /// Build the cache store, provider, orchestrator and limiter described
    /// by `config`.
    pub async fn from_config(config: &Config, secrets: &Secrets) -> Result<Self> {
        let cache = build_cache(config).await?;
        let provider = build_provider(config, secrets)?;

        let search = SearchService::builder(provider)
            .cache(cache)
            .ttl(config.cache.ttl())
            .single_flight(config.search.single_flight)
            .build()?;
        let limiter = ClientRateLimiter::new(&config.rate_limit)?;

        Ok(Self::new(search, limiter))
    }
}

async fn build_cache(config: &Config) -> Result<Arc<dyn CacheStore>> {
    match config.cache.backend {
        CacheBackend::Memory => Ok(Arc::new(MemoryStore::with_max_entries(
            config.cache.max_entries,
        ))),
        #[cfg(feature = "redis")]
        CacheBackend::Redis => Ok(Arc::new(
            crate::cache::RedisStore::connect(&config.cache.redis_url).await,
        )),
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis => Err(crate::ImgcacheError::Configuration(
            "cache.backend = \"redis\" requires the `redis` feature".to_string(),
        )),
    }
}

#[cfg(feature = "unsplash")]
fn build_provider(config: &Config, secrets: &Secrets) -> Result<Arc<dyn ImageSearchProvider>> {
    use crate::providers::UnsplashClient;

    let key = secrets.unsplash_key();
    if key.is_none() {
        warn!(
            env = config::UNSPLASH_KEY_ENV,
            "no Unsplash access key configured, uncached searches will fail"
        );
    }

    let mut client = UnsplashClient::with_base_url(key, &config.provider.base_url);
    if let Some(secs) = config.provider.timeout_secs {
        client = client.with_timeout(std::time::Duration::from_secs(secs))?;
    }
    info!(base_url = %config.provider.base_url, "using Unsplash provider");
    Ok(Arc::new(client))
}

#[cfg(not(feature = "unsplash"))]
fn build_provider(_config: &Config, _secrets: &Secrets) -> Result<Arc<dyn ImageSearchProvider>> {
    Err(crate::ImgcacheError::Configuration(
        "no image provider compiled in; enable the `unsplash` feature".to_string(),
    ))
}

/// Build the HTTP router.
///
/// `/api/images` sits behind the rate limiter; `/health` does not.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/images", get(service::search_images))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state.limiter),
            middleware::rate_limit,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(service::health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
