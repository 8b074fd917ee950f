//! In-memory resolution cache.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use aegis_core::error::CacheError;

use super::ResolutionCache;

struct CacheEntry {
    value: bool,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// An in-memory [`ResolutionCache`] with per-entry TTLs.
///
/// Expired entries are dropped lazily on read; the synchronizer's
/// scoped eviction keeps the map from accumulating entries for roles
/// that keep changing.
#[derive(Default)]
pub struct InMemoryResolutionCache {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryResolutionCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries (expired ones may still be counted until
    /// they are read).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResolutionCache for InMemoryResolutionCache {
    fn get(&self, key: &str) -> Result<Option<bool>, CacheError> {
        let now = Instant::now();

        {
            let Some(entry) = self.entries.get(key) else {
                return Ok(None);
            };
            if !entry.is_expired(now) {
                return Ok(Some(entry.value));
            }
            // Fall through with the shard lock released before removal.
        }

        self.entries.remove(key);
        Ok(None)
    }

    fn put(&self, key: &str, value: bool, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn evict_scope(&self, prefix: &str) -> Result<(), CacheError> {
        self.entries.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries.clear();
        Ok(())
    }

    fn supports_scoped_eviction(&self) -> bool {
        true
    }
}
