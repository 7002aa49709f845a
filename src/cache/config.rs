//! Cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Capacity and expiry settings of a [`CacheManager`](super::CacheManager).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use vuege::cache::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_max_size(50)
///     .with_default_ttl(Duration::from_secs(30));
/// assert!(config.enable_stats);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries; inserting a new key beyond it evicts the
    /// least recently accessed entry.
    ///
    /// Default: 1000
    pub max_size: usize,

    /// TTL applied when `set` is called without one.
    ///
    /// Default: 5 minutes
    pub default_ttl: Duration,

    /// Whether hits, misses, sets, deletes and evictions are counted.
    ///
    /// Default: `true`
    pub enable_stats: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            default_ttl: Duration::from_secs(300), // 5 minutes
            enable_stats: true,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity (at least 1).
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, enable: bool) -> Self {
        self.enable_stats = enable;
        self
    }
}
