//! Telemetry metric name constants.
//!
//! Centralised metric names for imgcache. Consumers install their own
//! `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `imgcache_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider`: provider name (e.g. "unsplash")
//! - `status`: outcome: "ok" or "error"

/// Total searches handled by the orchestrator (after validation).
///
/// Labels: `status` ("ok" | "error").
pub const SEARCHES_TOTAL: &str = "imgcache_searches_total";

/// Total upstream provider calls.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const PROVIDER_REQUESTS_TOTAL: &str = "imgcache_provider_requests_total";

/// Upstream provider call duration in seconds.
///
/// Labels: `provider`.
pub const PROVIDER_DURATION_SECONDS: &str = "imgcache_provider_duration_seconds";

/// Total cache hits.
pub const CACHE_HITS_TOTAL: &str = "imgcache_cache_hits_total";

/// Total cache misses (including lookups that failed because the store
/// was unavailable).
pub const CACHE_MISSES_TOTAL: &str = "imgcache_cache_misses_total";

/// Total cache operations that failed (store unreachable, bad entry).
///
/// Labels: `operation` ("get" | "set" | "decode").
pub const CACHE_ERRORS_TOTAL: &str = "imgcache_cache_errors_total";

/// Total requests rejected by the rate limiter.
pub const RATE_LIMITED_TOTAL: &str = "imgcache_rate_limited_total";

/// Total callers that joined an already in-flight provider fetch.
pub const COALESCED_TOTAL: &str = "imgcache_coalesced_total";
