//! Configuration for permission resolution.
//!
//! Configuration is passed explicitly into the checker, synchronizer and
//! cache constructors. Nothing in the core reads ambient process-wide
//! state at call time.

use std::time::Duration;

/// Configuration for the permission resolution subsystem.
#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    /// Slug of the role that bypasses all permission checks
    pub master_role_slug: String,

    /// Whether resolution outcomes are cached
    pub cache_enabled: bool,

    /// How long a cached outcome stays valid
    pub cache_ttl: Duration,

    /// Namespace prefix for cache keys, keeping resolution entries apart
    /// from unrelated data in a shared backend
    pub cache_key_prefix: String,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            master_role_slug: "master-admin".to_string(),
            cache_enabled: true,
            cache_ttl: Duration::from_secs(3600),
            cache_key_prefix: "role_permission".to_string(),
        }
    }
}

impl ResolutionConfig {
    /// Configuration with caching turned off entirely.
    pub fn without_cache() -> Self {
        Self {
            cache_enabled: false,
            ..Self::default()
        }
    }
}
