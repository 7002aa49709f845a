//! In-memory TTL cache.
//!
//! [`CacheManager`] is a synchronous, single-owner map with per-entry expiry,
//! capacity-bounded eviction of the least recently accessed entry and optional
//! hit/miss statistics. Table sessions use it to memoize exports.

mod config;
mod manager;

pub use config::CacheConfig;
pub use manager::{CacheManager, CacheStats};
