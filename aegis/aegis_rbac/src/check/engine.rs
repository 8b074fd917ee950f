//! The permission checking engine.

use std::collections::HashSet;
use std::sync::Arc;

use aegis_core::config::ResolutionConfig;
use aegis_core::error::Result;
use aegis_core::id::PermissionId;

use super::Decision;
use crate::cache::{resolution_key, role_scope, ResolutionCache};
use crate::hierarchy;
use crate::model::{Permission, PermissionTreeNode, Role};
use crate::store::{AssignmentStore, PermissionStore};

/// Resolves whether a role is granted a named permission.
///
/// Grant paths, in order: master-role bypass, direct assignment, and
/// (for module permissions only) a directly-assigned descendant.
/// Visibility propagation is one-directional: a module sees into its
/// subtree, an action never aggregates from its children.
pub struct PermissionChecker {
    /// Permission records and hierarchy links.
    permissions: Arc<dyn PermissionStore>,

    /// The role/permission assignment set.
    assignments: Arc<dyn AssignmentStore>,

    /// Optional outcome cache. A broken or absent cache only costs
    /// recomputation.
    cache: Option<Arc<dyn ResolutionCache>>,

    config: ResolutionConfig,
}

impl PermissionChecker {
    /// Creates a checker without a cache.
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

    /// Creates a checker that memoizes outcomes in `cache`.
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

    fn active_cache(&self) -> Option<&Arc<dyn ResolutionCache>> {
        if self.config.cache_enabled {
            self.cache.as_ref()
        } else {
            None
        }
    }

    /// Does `role` hold the permission named by `slug`?
    ///
    /// An unknown slug is a deny, not an error. Store failures do
    /// propagate; the checker cannot answer without its source of
    /// truth.
    pub fn has_permission(&self, role: &Role, slug: &str) -> Result<bool> {
        // Master bypass short-circuits ahead of the cache and is never
        // cached.
        if role.slug == self.config.master_role_slug {
            return Ok(true);
        }

        let key = resolution_key(&self.config.cache_key_prefix, &role.id, slug);

        if let Some(cache) = self.active_cache() {
            match cache.get(&key) {
                Ok(Some(cached)) => return Ok(cached),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(%err, slug, "resolution cache read failed; recomputing");
                }
            }
        }

        let granted = self.decide(role, slug)?.is_granted();

        if let Some(cache) = self.active_cache() {
            if let Err(err) = cache.put(&key, granted, self.config.cache_ttl) {
                tracing::warn!(%err, slug, "resolution cache write failed");
            }
        }

        Ok(granted)
    }

    /// The tagged outcome for `role` and `slug`, bypassing the cache.
    pub fn decide(&self, role: &Role, slug: &str) -> Result<Decision> {
        if role.slug == self.config.master_role_slug {
            return Ok(Decision::Bypass);
        }

        let Some(permission) = self.permissions.find_by_slug(slug)? else {
            return Ok(Decision::Deny);
        };

        if self.assignments.is_assigned(&role.id, &permission.id)? {
            return Ok(Decision::DirectGrant);
        }

        if permission.is_module() {
            let assigned = self.assignments.assigned_ids(&role.id)?;
            if !assigned.is_empty() {
                let descendants =
                    hierarchy::descendant_ids(self.permissions.as_ref(), permission.id)?;
                if descendants.iter().any(|id| assigned.contains(id)) {
                    return Ok(Decision::DescendantGrant);
                }
            }
        }

        Ok(Decision::Deny)
    }

    /// Whether `role` holds at least one of `slugs`. Short-circuits on
    /// the first grant.
    pub fn has_any_permission(&self, role: &Role, slugs: &[&str]) -> Result<bool> {
        for slug in slugs {
            if self.has_permission(role, slug)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether `role` holds every one of `slugs`. Short-circuits on the
    /// first deny.
    pub fn has_all_permissions(&self, role: &Role, slugs: &[&str]) -> Result<bool> {
        for slug in slugs {
            if !self.has_permission(role, slug)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether `role` may access the route named by `route_key`.
    ///
    /// Routes with no declared permission are unguarded: if no
    /// permission carries this route key, access is allowed.
    pub fn can_access_route(&self, role: &Role, route_key: &str) -> Result<bool> {
        match self.permissions.find_by_route_key(route_key)? {
            None => Ok(true),
            Some(permission) => self.has_permission(role, &permission.slug),
        }
    }

    /// Identity compare against a role slug.
    pub fn has_role(&self, role: &Role, slug: &str) -> bool {
        role.slug == slug
    }

    /// Whether the role's slug is any of `slugs`.
    pub fn has_any_role(&self, role: &Role, slugs: &[&str]) -> bool {
        slugs.iter().any(|slug| role.slug == *slug)
    }

    /// The full descendant id set of a permission.
    pub fn all_descendant_ids(&self, id: PermissionId) -> Result<HashSet<PermissionId>> {
        hierarchy::descendant_ids(self.permissions.as_ref(), id)
    }

    /// The ancestor chain of a permission, nearest parent first.
    pub fn ancestors(&self, id: PermissionId) -> Result<Vec<Permission>> {
        hierarchy::ancestors(self.permissions.as_ref(), id)
    }

    /// The nested tree rooted at a permission, or `None` if it does not
    /// exist.
    pub fn permission_tree(&self, root: PermissionId) -> Result<Option<PermissionTreeNode>> {
        hierarchy::to_tree(self.permissions.as_ref(), root)
    }

    /// Evict every cached outcome for one role.
    pub fn clear_cache(&self, role: &Role) {
        if let Some(cache) = self.active_cache() {
            let scope = role_scope(&self.config.cache_key_prefix, &role.id);
            let result = if cache.supports_scoped_eviction() {
                cache.evict_scope(&scope)
            } else {
                cache.clear()
            };
            if let Err(err) = result {
                tracing::warn!(%err, role = %role.slug, "cache eviction failed");
            }
        }
    }

    /// Evict every cached outcome.
    pub fn clear_cache_all(&self) {
        if let Some(cache) = self.active_cache() {
            if let Err(err) = cache.clear() {
                tracing::warn!(%err, "cache flush failed");
            }
        }
    }
}
