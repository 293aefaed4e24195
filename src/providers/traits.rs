//! Provider trait for upstream image search.
//!
//! The orchestrator only knows about [`ImageSearchProvider`]; concrete
//! upstreams (and test doubles) implement it.
//!
//! # Error contract
//!
//! - `MisconfiguredCredential`: the provider has no usable credential.
//!   Returned before any network I/O.
//! - `Upstream { status, message }`: the upstream answered with a
//!   non-2xx status, or could not be reached (status 500). The status and
//!   message are passed through to the HTTP caller.
//! - anything else is treated as an internal failure.
//!
//! Providers must not retry internally.

use async_trait::async_trait;

use crate::Result;
use crate::types::{SearchQuery, SearchResult};

/// An upstream image search service.
#[async_trait]
pub trait ImageSearchProvider: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Run a search and return normalized records in ranking order.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult>;
}
