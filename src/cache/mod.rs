//! Caching subsystem.
//!
//! Search results are cached as JSON strings behind the [`CacheStore`]
//! trait, keyed by [`cache_key`]. Two backends:
//!
//! - [`MemoryStore`]: in-process moka cache with per-entry TTL. The
//!   default; zero external dependencies.
//!
//! - [`RedisStore`]: shared redis instance (feature `redis`), for running
//!   several proxies against one cache. The on-wire layout (`images:<text>-<page>`
//!   keys, JSON array values, `SETEX` TTL) carries no schema version, so
//!   changing the [`ImageRecord`](crate::ImageRecord) shape is a breaking change
//!   for a shared cache.
//!
//! Stores own expiry. Callers only ever `get` and `set`; nothing is deleted
//! explicitly.

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
mod store;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis::RedisStore;
pub use store::{CacheStore, DEFAULT_TTL, cache_key};
