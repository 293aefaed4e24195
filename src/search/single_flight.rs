//! Per-key coalescing of in-flight provider fetches.
//!
//! The first caller for a key (the leader) registers a shared handle to its
//! fetch; callers arriving while it is pending await the same handle
//! instead of starting their own. The entry is removed when the leader
//! finishes or is dropped, so the next miss after that starts a fresh
//! fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

use crate::Result;
use crate::telemetry;
use crate::types::SearchResult;

type SharedFetch = Shared<BoxFuture<'static, Result<SearchResult>>>;
type PendingMap = Arc<Mutex<HashMap<String, SharedFetch>>>;

/// Map of cache key to the pending fetch for that key.
#[derive(Default)]
pub struct InFlight {
    pending: PendingMap,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a fetch currently pending.
    pub fn len(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `fetch` for `key`, or join the fetch already pending for it.
    ///
    /// `fetch` is dropped unpolled when joining, so it must not have side
    /// effects before its first poll.
    pub async fn run<F>(&self, key: &str, fetch: F) -> Result<SearchResult>
    where
        F: Future<Output = Result<SearchResult>> + Send + 'static,
    {
        let (shared, _leader) = {
            let mut pending = lock(&self.pending);
            match pending.get(key) {
                Some(existing) => {
                    metrics::counter!(telemetry::COALESCED_TOTAL).increment(1);
                    (existing.clone(), None)
                }
                None => {
                    let shared = fetch.boxed().shared();
                    pending.insert(key.to_string(), shared.clone());
                    let guard = LeaderGuard {
                        pending: Arc::clone(&self.pending),
                        key: key.to_string(),
                    };
                    (shared, Some(guard))
                }
            }
        };

        shared.await
    }
}

fn lock(pending: &PendingMap) -> MutexGuard<'_, HashMap<String, SharedFetch>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes the leader's entry on completion or cancellation.
struct LeaderGuard {
    pending: PendingMap,
    key: String,
}

impl Drop for LeaderGuard {
    fn drop(&mut self) {
        lock(&self.pending).remove(&self.key);
    }
}
