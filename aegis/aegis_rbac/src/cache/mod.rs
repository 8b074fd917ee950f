mod in_memory;

use std::time::Duration;

use aegis_core::error::CacheError;
use aegis_core::id::RoleId;

/// Derive the cache key for a `(role, slug)` resolution outcome.
///
/// The role id is a UUID and cannot contain the separator, and the slug
/// comes last, so distinct `(role, slug)` pairs never collide. The
/// prefix namespaces resolution entries apart from unrelated data in a
/// shared backend.
pub fn resolution_key(prefix: &str, role_id: &RoleId, slug: &str) -> String {
    format!("{}:{}:{}", prefix, role_id, slug)
}

/// Derive the key prefix shared by every resolution entry of one role,
/// used for scoped eviction.
pub fn role_scope(prefix: &str, role_id: &RoleId) -> String {
    format!("{}:{}:", prefix, role_id)
}

/// A cache of permission resolution outcomes.
///
/// Backends are collaborators that may fail; every operation returns a
/// [`CacheError`] that callers recover from locally. A broken cache
/// degrades a check to direct computation, it never fails it.
pub trait ResolutionCache: Send + Sync {
    /// Look up a cached outcome. Expired entries read as misses.
    fn get(&self, key: &str) -> Result<Option<bool>, CacheError>;

    /// Store an outcome for `ttl`.
    fn put(&self, key: &str, value: bool, ttl: Duration) -> Result<(), CacheError>;

    /// Evict every entry whose key starts with `prefix`.
    ///
    /// Only meaningful when [`supports_scoped_eviction`] is true;
    /// backends without scoped eviction may ignore this and rely on
    /// callers falling back to [`clear`].
    ///
    /// [`supports_scoped_eviction`]: ResolutionCache::supports_scoped_eviction
    /// [`clear`]: ResolutionCache::clear
    fn evict_scope(&self, prefix: &str) -> Result<(), CacheError>;

    /// Drop every entry.
    fn clear(&self) -> Result<(), CacheError>;

    /// Whether this backend can evict by key prefix. Callers that must
    /// invalidate one role's entries fall back to a full [`clear`] when
    /// this is false; stale outcomes must never outlive a write.
    ///
    /// [`clear`]: ResolutionCache::clear
    fn supports_scoped_eviction(&self) -> bool;
}

pub use in_memory::InMemoryResolutionCache;
