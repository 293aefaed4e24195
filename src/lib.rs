//! imgcache - caching reverse proxy for image search APIs
//!
//! This crate sits in front of an upstream image search provider (Unsplash
//! by default) and serves repeated queries from a TTL cache. Requests pass
//! through a per-client [`ClientRateLimiter`], are validated into a
//! [`SearchQuery`], and are then answered by the [`SearchService`]:
//!
//! ```text
//!   request ─► rate limiter ─► validator ─► SearchService ─► CacheStore
//!                                                │    miss
//!                                                └──────────► ImageSearchProvider
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use imgcache::providers::UnsplashClient;
//! use imgcache::{RawSearchParams, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> imgcache::Result<()> {
//!     let provider = UnsplashClient::new(Some("your-access-key".to_string()));
//!     let service = SearchService::builder(Arc::new(provider)).build()?;
//!
//!     let images = service
//!         .handle(&RawSearchParams::new("cats", "1", "5"))
//!         .await?;
//!
//!     for image in images {
//!         println!("{}: {}", image.title, image.url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod providers;
pub mod rate_limit;
pub mod search;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::{CacheStore, MemoryStore};
pub use error::{ImgcacheError, Result, ValidationError};
pub use providers::ImageSearchProvider;
pub use rate_limit::{ClientRateLimiter, RateLimitConfig};
pub use search::{SearchService, SearchServiceBuilder};
pub use types::{ImageRecord, RawParam, RawSearchParams, SearchQuery, SearchResult};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, version_string};
