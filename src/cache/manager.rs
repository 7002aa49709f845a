//! TTL cache with least-recently-accessed eviction.

use super::config::CacheConfig;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    /// `None` when the TTL runs past what `Instant` can represent.
    expires_at: Option<Instant>,
    access_count: u64,
    /// Logical clock value of the last read or write.
    last_access: u64,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    hits: u64,
    misses: u64,
    sets: u64,
    deletes: u64,
    evictions: u64,
}

/// Snapshot of cache health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Stored entries, expired ones included until they are purged.
    pub size: usize,
    pub max_size: usize,
    pub valid_items: usize,
    pub expired_items: usize,
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
    /// `hits / (hits + misses)`, `0.0` before the first lookup.
    pub hit_rate: f64,
}

/// String-keyed cache with per-entry TTL.
///
/// Expired entries are dropped lazily when they are looked up and eagerly by
/// [`cleanup`](Self::cleanup). When the cache is full, storing a new key evicts
/// the entry that was read or written longest ago.
///
/// # Example
///
/// ```
/// use vuege::cache::{CacheConfig, CacheManager};
///
/// let mut cache = CacheManager::new(CacheConfig::default().with_max_size(2));
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.get("a");
/// cache.set("c", 3);
/// assert!(cache.has("a"));
/// assert!(!cache.has("b"));
/// ```
#[derive(Debug)]
pub struct CacheManager<V> {
    entries: HashMap<String, Entry<V>>,
    config: CacheConfig,
    counters: Counters,
    clock: u64,
}

impl<V> Default for CacheManager<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<V> CacheManager<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
            counters: Counters::default(),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn count(&mut self, bump: impl FnOnce(&mut Counters)) {
        if self.config.enable_stats {
            bump(&mut self.counters);
        }
    }

    /// Stores `value` under `key` with the default TTL.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let ttl = self.config.default_ttl;
        self.set_with_ttl(key, value, ttl);
    }

    /// Stores `value` under `key`, expiring after `ttl`.
    pub fn set_with_ttl(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.max_size {
            self.evict_oldest();
        }
        let now = Instant::now();
        let access = self.tick();
        self.entries.insert(
            key,
            Entry {
                value,
                expires_at: now.checked_add(ttl),
                access_count: 0,
                last_access: access,
            },
        );
        self.count(|c| c.sets += 1);
    }

    /// Returns `true` if `key` holds a live entry. Does not count as an access.
    pub fn has(&mut self, key: &str) -> bool {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Removes `key`; returns whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.count(|c| c.deletes += 1);
        }
        removed
    }

    pub fn clear(&mut self) {
        tracing::debug!(entries = self.entries.len(), "clearing cache");
        self.entries.clear();
    }

    /// Restarts the TTL of a live entry, using `ttl` or the default.
    ///
    /// # Returns
    ///
    /// `false` if the key is missing or already expired.
    pub fn touch(&mut self, key: &str, ttl: Option<Duration>) -> bool {
        let now = Instant::now();
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        let access = self.tick();
        match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.expires_at = now.checked_add(ttl);
                entry.access_count += 1;
                entry.last_access = access;
                true
            }
            Some(_) => {
                self.entries.remove(key);
                false
            }
            None => false,
        }
    }

    /// Purges expired entries.
    ///
    /// # Returns
    ///
    /// The number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, "purged expired cache entries");
        }
        removed
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of stored entries, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let expired_items = self.entries.values().filter(|e| e.is_expired(now)).count();
        let Counters {
            hits,
            misses,
            sets,
            deletes,
            evictions,
        } = self.counters;
        let lookups = hits + misses;
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if lookups == 0 { 0.0 } else { hits as f64 / lookups as f64 };
        CacheStats {
            size: self.entries.len(),
            max_size: self.config.max_size,
            valid_items: self.entries.len() - expired_items,
            expired_items,
            hits,
            misses,
            sets,
            deletes,
            evictions,
            hit_rate,
        }
    }

    pub fn reset_stats(&mut self) {
        self.counters = Counters::default();
    }

    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Replaces the configuration; a smaller `max_size` applies to later
    /// inserts only.
    pub fn update_config(&mut self, config: CacheConfig) {
        self.config = config;
    }

    /// Number of successful reads of `key` since it was stored.
    pub fn access_count(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|e| e.access_count)
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            tracing::trace!(key = %key, "evicting least recently used cache entry");
            self.entries.remove(&key);
            self.count(|c| c.evictions += 1);
        }
    }
}

impl<V: Clone> CacheManager<V> {
    /// Returns a copy of the live value under `key`.
    ///
    /// A missing or expired key counts as a miss; an expired entry is removed.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        let access = self.tick();
        let value = match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.access_count += 1;
                entry.last_access = access;
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        };
        if value.is_some() {
            self.count(|c| c.hits += 1);
        } else {
            self.count(|c| c.misses += 1);
        }
        value
    }
}
