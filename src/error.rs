//! imgcache error types

use std::time::Duration;

/// Why a search request failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid query parameter")]
    InvalidQuery,

    #[error("Invalid page or per_page parameter")]
    InvalidPagination,
}

/// imgcache error types
///
/// Cloneable so a single provider outcome can be shared between
/// coalesced callers (see [`crate::search::single_flight`]).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImgcacheError {
    // Client errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    // Infrastructure errors
    /// The cache backend could not be reached. Never fatal to a search.
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    // Provider errors
    #[error("image provider credential is not configured")]
    MisconfiguredCredential,

    /// Non-2xx (or unreachable) upstream, carrying the status and message
    /// to pass through to the caller.
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ImgcacheError {
    /// Whether the error was caused by the client rather than by us or upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RateLimited { .. })
    }
}

impl From<serde_json::Error> for ImgcacheError {
    fn from(err: serde_json::Error) -> Self {
        ImgcacheError::Json(err.to_string())
    }
}

/// Result type alias for imgcache operations
pub type Result<T> = std::result::Result<T, ImgcacheError>;
