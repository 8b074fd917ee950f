//! Assignment synchronization.
//!
//! Replaces a role's direct permission set in one atomic store write,
//! with optional recursive expansion to descendants, then invalidates
//! the role's cached resolution outcomes.

use std::collections::HashSet;
use std::sync::Arc;

use aegis_core::config::ResolutionConfig;
use aegis_core::error::{AssignmentError, Result};
use aegis_core::id::{PermissionId, RoleId};

use crate::cache::{role_scope, ResolutionCache};
use crate::hierarchy;
use crate::model::Role;
use crate::store::{AssignmentStore, PermissionStore};

/// Replaces a role's direct permission assignments.
pub struct AssignmentSynchronizer {
    permissions: Arc<dyn PermissionStore>,
    assignments: Arc<dyn AssignmentStore>,
    cache: Option<Arc<dyn ResolutionCache>>,
    config: ResolutionConfig,
}

impl AssignmentSynchronizer {
    /// Creates a synchronizer without a cache to invalidate.
    pub fn new(
        permissions: Arc<dyn PermissionStore>,
        assignments: Arc<dyn AssignmentStore>,
        config: ResolutionConfig,
    ) -> Self {
        Self {
            permissions,
            assignments,
            cache: None,
            config,
        }
    }

    /// Creates a synchronizer that evicts `cache` after each write.
    ///
    /// Pass the same cache the checker reads from, or syncs will leave
    /// stale outcomes behind.
    pub fn with_cache(
        permissions: Arc<dyn PermissionStore>,
        assignments: Arc<dyn AssignmentStore>,
        cache: Arc<dyn ResolutionCache>,
        config: ResolutionConfig,
    ) -> Self {
        Self {
            permissions,
            assignments,
            cache: Some(cache),
            config,
        }
    }

    /// Replace `role`'s entire assignment set with `permission_ids`.
    ///
    /// Every requested id must exist; otherwise the whole operation is
    /// rejected with [`AssignmentError::UnknownPermissions`] and the
    /// previous set stays intact. With `recursive`, each id's full
    /// descendant set is unioned into the target. Without it, the
    /// target is exactly the given set: ancestors and containing
    /// modules are never materialized, since module visibility is
    /// computed at check time.
    pub fn sync_permissions(
        &self,
        role: &Role,
        permission_ids: HashSet<PermissionId>,
        recursive: bool,
    ) -> Result<()> {
        let existing = self.permissions.exist_all(&permission_ids)?;
        if existing.len() != permission_ids.len() {
            let mut missing: Vec<PermissionId> = permission_ids
                .difference(&existing)
                .copied()
                .collect();
            missing.sort();
            return Err(AssignmentError::UnknownPermissions(missing).into());
        }

        let mut target = permission_ids.clone();
        if recursive {
            for id in &permission_ids {
                target.extend(hierarchy::descendant_ids(self.permissions.as_ref(), *id)?);
            }
        }

        let assigned = target.len();
        self.assignments.replace_assignments(&role.id, target)?;

        // Evict only after the store write committed, so no reader can
        // observe an empty cache entry refilled from the pre-write set.
        self.invalidate_role(&role.id);

        tracing::debug!(role = %role.slug, assigned, recursive, "assignments replaced");

        Ok(())
    }

    fn invalidate_role(&self, role_id: &RoleId) {
        let Some(cache) = &self.cache else {
            return;
        };
        if !self.config.cache_enabled {
            return;
        }

        let result = if cache.supports_scoped_eviction() {
            cache.evict_scope(&role_scope(&self.config.cache_key_prefix, role_id))
        } else {
            // No scoped eviction: flush everything rather than leave
            // stale outcomes for this role.
            cache.clear()
        };

        if let Err(err) = result {
            // The store write already committed; readers degrade to
            // recomputation while the backend is down.
            tracing::warn!(%err, %role_id, "cache invalidation failed after sync");
        }
    }
}
