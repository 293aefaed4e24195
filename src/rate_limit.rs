//! Per-client request throttling.
//!
//! [`ClientRateLimiter`] counts requests per client IP in fixed windows. A
//! client's window opens with its first request and lasts `window`; once it
//! has sent `max_requests` in that window, every further request is
//! rejected until the window closes. Window state lives in a moka cache
//! whose time-to-live is the window length, so a closed window simply
//! disappears and the next request opens a fresh one.

use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use moka::sync::Cache;
use serde::Deserialize;
use tracing::debug;

use crate::telemetry;
use crate::{ImgcacheError, Result};

/// Default throttling window: 15 minutes.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Default number of requests allowed per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default body of a throttled response.
pub const DEFAULT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Rate limiter configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in seconds (default: 900).
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Requests allowed per client per window (default: 100).
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Message returned to throttled clients.
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
            message: default_message(),
        }
    }
}

fn default_window_secs() -> u64 {
    DEFAULT_WINDOW.as_secs()
}

fn default_max_requests() -> u32 {
    DEFAULT_MAX_REQUESTS
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

impl RateLimitConfig {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window_secs: window.as_secs(),
            max_requests,
            message: default_message(),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// One client's current window.
struct Window {
    opened: Instant,
    count: AtomicU32,
}

/// Request throttle keyed by client address.
pub struct ClientRateLimiter {
    windows: Cache<IpAddr, Arc<Window>>,
    window: Duration,
    max_requests: u32,
    message: String,
}

impl ClientRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Result<Self> {
        if config.max_requests == 0 {
            return Err(ImgcacheError::Configuration(
                "rate_limit.max_requests must be at least 1".to_string(),
            ));
        }
        let window = config.window();
        if window.is_zero() {
            return Err(ImgcacheError::Configuration(
                "rate_limit.window_secs must be at least 1".to_string(),
            ));
        }

        let windows = Cache::builder().time_to_live(window).build();

        Ok(Self {
            windows,
            window,
            max_requests: config.max_requests,
            message: config.message.clone(),
        })
    }

    /// Record a request from `client`, failing with `RateLimited` once it
    /// is over quota for its current window.
    pub fn check(&self, client: IpAddr) -> Result<()> {
        let window = self.windows.get_with(client, || {
            Arc::new(Window {
                opened: Instant::now(),
                count: AtomicU32::new(0),
            })
        });

        let count = window.count.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        if count <= self.max_requests {
            return Ok(());
        }

        let retry_after = self.window.saturating_sub(window.opened.elapsed());
        debug!(%client, ?retry_after, "rate limit exceeded");
        metrics::counter!(telemetry::RATE_LIMITED_TOTAL).increment(1);
        Err(ImgcacheError::RateLimited {
            retry_after: Some(retry_after),
        })
    }

    /// Message to send to throttled clients.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Drop state for clients whose window has closed.
    pub fn retain_recent(&self) {
        self.windows.run_pending_tasks();
    }

    /// Number of clients with an open window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.run_pending_tasks();
        usize::try_from(self.windows.entry_count()).unwrap_or(usize::MAX)
    }
}
