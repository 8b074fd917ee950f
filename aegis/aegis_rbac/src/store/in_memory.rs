//! In-memory permission and assignment store.
//!
//! Backs both store traits with `DashMap`s for thread-safe concurrent
//! access. Structural writes (`insert`, `set_parent`) run the hierarchy
//! validator before touching any map, so a cycle can never be committed.

use std::collections::HashSet;

use chrono::Utc;
use dashmap::DashMap;

use aegis_core::error::{HierarchyError, Result, StoreError};
use aegis_core::id::{PermissionId, RoleId};

use super::{AssignmentStore, PermissionStore};
use crate::hierarchy::validate_parent_assignment;
use crate::model::Permission;

/// An in-memory implementation of [`PermissionStore`] and
/// [`AssignmentStore`].
#[derive(Default)]
pub struct InMemoryAuthzStore {
    /// Permission records by id.
    permissions: DashMap<PermissionId, Permission>,

    /// Slug index. Slugs are globally unique.
    by_slug: DashMap<String, PermissionId>,

    /// Route-key index.
    by_route: DashMap<String, PermissionId>,

    /// Child-id sets by parent id.
    children: DashMap<PermissionId, HashSet<PermissionId>>,

    /// Directly-assigned permission ids by role id.
    assignments: DashMap<RoleId, HashSet<PermissionId>>,
}

impl InMemoryAuthzStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new permission, returning its id.
    ///
    /// Rejects duplicate slugs and dangling or cycle-forming parent
    /// links before anything is written.
    pub fn insert(&self, permission: Permission) -> Result<PermissionId> {
        if self.by_slug.contains_key(&permission.slug) {
            return Err(StoreError::DuplicateSlug(permission.slug).into());
        }

        if let Some(parent_id) = permission.parent_id {
            if !self.permissions.contains_key(&parent_id) {
                return Err(HierarchyError::ParentNotFound(parent_id).into());
            }
            validate_parent_assignment(self, Some(permission.id), Some(parent_id))?;
        }

        let id = permission.id;

        self.by_slug.insert(permission.slug.clone(), id);
        if let Some(route_key) = &permission.route_key {
            self.by_route.insert(route_key.clone(), id);
        }
        if let Some(parent_id) = permission.parent_id {
            self.children.entry(parent_id).or_default().insert(id);
        }
        self.permissions.insert(id, permission);

        Ok(id)
    }

    /// Change a permission's parent link.
    ///
    /// `None` detaches the permission into a root. The hierarchy
    /// validator gates the write.
    pub fn set_parent(
        &self,
        id: &PermissionId,
        new_parent_id: Option<PermissionId>,
    ) -> Result<()> {
        if !self.permissions.contains_key(id) {
            return Err(StoreError::PermissionNotFound(*id).into());
        }

        if let Some(parent_id) = new_parent_id {
            if !self.permissions.contains_key(&parent_id) {
                return Err(HierarchyError::ParentNotFound(parent_id).into());
            }
        }
        validate_parent_assignment(self, Some(*id), new_parent_id)?;

        let old_parent_id = self.permissions.get(id).and_then(|p| p.parent_id);

        if let Some(old_parent_id) = old_parent_id {
            if let Some(mut siblings) = self.children.get_mut(&old_parent_id) {
                siblings.remove(id);
            }
        }
        if let Some(parent_id) = new_parent_id {
            self.children.entry(parent_id).or_default().insert(*id);
        }

        if let Some(mut record) = self.permissions.get_mut(id) {
            record.parent_id = new_parent_id;
            record.updated_at = Utc::now();
        }

        Ok(())
    }

    /// Remove a permission.
    ///
    /// Its children are re-rooted, and any assignment rows referencing
    /// it are cascaded away.
    pub fn remove(&self, id: &PermissionId) -> Result<()> {
        let Some((_, record)) = self.permissions.remove(id) else {
            return Err(StoreError::PermissionNotFound(*id).into());
        };

        self.by_slug.remove(&record.slug);
        if let Some(route_key) = &record.route_key {
            self.by_route.remove(route_key);
        }
        if let Some(parent_id) = record.parent_id {
            if let Some(mut siblings) = self.children.get_mut(&parent_id) {
                siblings.remove(id);
            }
        }

        // Re-root the orphaned children.
        if let Some((_, child_ids)) = self.children.remove(id) {
            for child_id in child_ids {
                if let Some(mut child) = self.permissions.get_mut(&child_id) {
                    child.parent_id = None;
                    child.updated_at = Utc::now();
                }
            }
        }

        // Cascade assignment rows.
        for mut entry in self.assignments.iter_mut() {
            entry.value_mut().remove(id);
        }

        Ok(())
    }
}

impl PermissionStore for InMemoryAuthzStore {
    fn find_by_id(&self, id: &PermissionId) -> Result<Option<Permission>> {
        Ok(self.permissions.get(id).map(|p| p.clone()))
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Permission>> {
        let Some(id) = self.by_slug.get(slug).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(&id)
    }

    fn find_by_route_key(&self, route_key: &str) -> Result<Option<Permission>> {
        let Some(id) = self.by_route.get(route_key).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(&id)
    }

    fn children_of(&self, id: &PermissionId) -> Result<Vec<Permission>> {
        let child_ids: Vec<PermissionId> = self
            .children
            .get(id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();

        let mut children: Vec<Permission> = child_ids
            .into_iter()
            .filter_map(|child_id| self.permissions.get(&child_id).map(|p| p.clone()))
            .collect();

        children.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));

        Ok(children)
    }

    fn parent_of(&self, id: &PermissionId) -> Result<Option<Permission>> {
        let Some(parent_id) = self.permissions.get(id).and_then(|p| p.parent_id) else {
            return Ok(None);
        };
        self.find_by_id(&parent_id)
    }

    fn exist_all(&self, ids: &HashSet<PermissionId>) -> Result<HashSet<PermissionId>> {
        Ok(ids
            .iter()
            .filter(|id| self.permissions.contains_key(id))
            .copied()
            .collect())
    }
}

impl AssignmentStore for InMemoryAuthzStore {
    fn assigned_ids(&self, role_id: &RoleId) -> Result<HashSet<PermissionId>> {
        Ok(self
            .assignments
            .get(role_id)
            .map(|set| set.clone())
            .unwrap_or_default())
    }

    fn is_assigned(&self, role_id: &RoleId, permission_id: &PermissionId) -> Result<bool> {
        Ok(self
            .assignments
            .get(role_id)
            .map(|set| set.contains(permission_id))
            .unwrap_or(false))
    }

    fn replace_assignments(&self, role_id: &RoleId, ids: HashSet<PermissionId>) -> Result<()> {
        // Single map insert: concurrent replaces for the same role
        // serialize on the shard lock, last committed wins whole.
        self.assignments.insert(*role_id, ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::Error;
    use crate::model::PermissionKind;

    fn action(slug: &str) -> Permission {
        Permission::new(slug, slug, PermissionKind::Action)
    }

    fn module(slug: &str) -> Permission {
        Permission::new(slug, slug, PermissionKind::Module)
    }

    #[test]
    fn test_insert_and_find() {
        let store = InMemoryAuthzStore::new();
        let permission = action("posts.edit").with_route_key("posts.edit.route");
        let id = store.insert(permission).unwrap();

        assert_eq!(store.find_by_id(&id).unwrap().unwrap().slug, "posts.edit");
        assert_eq!(store.find_by_slug("posts.edit").unwrap().unwrap().id, id);
        assert_eq!(
            store
                .find_by_route_key("posts.edit.route")
                .unwrap()
                .unwrap()
                .id,
            id
        );
        assert!(store.find_by_slug("posts.delete").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let store = InMemoryAuthzStore::new();
        store.insert(action("posts.edit")).unwrap();

        let err = store.insert(action("posts.edit")).unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::DuplicateSlug(_))));
    }

    #[test]
    fn test_insert_with_missing_parent_rejected() {
        let store = InMemoryAuthzStore::new();
        let orphan = action("posts.edit").with_parent(PermissionId::new());

        let err = store.insert(orphan).unwrap_err();
        assert!(matches!(
            err,
            Error::Hierarchy(HierarchyError::ParentNotFound(_))
        ));
    }

    #[test]
    fn test_children_ordered_by_order_then_id() {
        let store = InMemoryAuthzStore::new();
        let parent_id = store.insert(module("posts")).unwrap();

        let b = action("posts.b").with_parent(parent_id).with_order(1);
        let a = action("posts.a").with_parent(parent_id).with_order(2);
        let tie1 = action("posts.tie1").with_parent(parent_id).with_order(2);
        let b_id = b.id;
        store.insert(b).unwrap();
        store.insert(a).unwrap();
        store.insert(tie1).unwrap();

        let children = store.children_of(&parent_id).unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].id, b_id, "lowest order first");
        // The order-2 tie is broken by id.
        assert!(children[1].id < children[2].id);
    }

    #[test]
    fn test_set_parent_moves_child() {
        let store = InMemoryAuthzStore::new();
        let old_parent = store.insert(module("a")).unwrap();
        let new_parent = store.insert(module("b")).unwrap();
        let child = store
            .insert(action("a.child").with_parent(old_parent))
            .unwrap();

        store.set_parent(&child, Some(new_parent)).unwrap();

        assert!(store.children_of(&old_parent).unwrap().is_empty());
        assert_eq!(store.children_of(&new_parent).unwrap()[0].id, child);
        assert_eq!(
            store.parent_of(&child).unwrap().unwrap().id,
            new_parent
        );
    }

    #[test]
    fn test_set_parent_rejects_cycle_before_commit() {
        let store = InMemoryAuthzStore::new();
        let top = store.insert(module("top")).unwrap();
        let mid = store.insert(module("mid").with_parent(top)).unwrap();

        let err = store.set_parent(&top, Some(mid)).unwrap_err();
        assert!(matches!(err, Error::Hierarchy(HierarchyError::Cycle { .. })));

        // Nothing moved.
        assert_eq!(store.parent_of(&mid).unwrap().unwrap().id, top);
        assert!(store.parent_of(&top).unwrap().is_none());
    }

    #[test]
    fn test_exist_all_returns_existing_subset() {
        let store = InMemoryAuthzStore::new();
        let known = store.insert(action("posts.edit")).unwrap();
        let unknown = PermissionId::new();

        let existing = store
            .exist_all(&[known, unknown].into_iter().collect())
            .unwrap();
        assert_eq!(existing, [known].into_iter().collect());
    }

    #[test]
    fn test_replace_assignments_is_full_replace() {
        let store = InMemoryAuthzStore::new();
        let role_id = RoleId::new();
        let a = store.insert(action("a")).unwrap();
        let b = store.insert(action("b")).unwrap();

        store
            .replace_assignments(&role_id, [a].into_iter().collect())
            .unwrap();
        store
            .replace_assignments(&role_id, [b].into_iter().collect())
            .unwrap();

        assert_eq!(
            store.assigned_ids(&role_id).unwrap(),
            [b].into_iter().collect()
        );
        assert!(!store.is_assigned(&role_id, &a).unwrap());
        assert!(store.is_assigned(&role_id, &b).unwrap());
    }

    #[test]
    fn test_remove_cascades_assignments_and_reroots_children() {
        let store = InMemoryAuthzStore::new();
        let role_id = RoleId::new();
        let parent = store.insert(module("posts")).unwrap();
        let child = store
            .insert(action("posts.edit").with_parent(parent))
            .unwrap();
        store
            .replace_assignments(&role_id, [parent, child].into_iter().collect())
            .unwrap();

        store.remove(&parent).unwrap();

        assert!(store.find_by_id(&parent).unwrap().is_none());
        assert!(store.find_by_slug("posts").unwrap().is_none());
        assert_eq!(
            store.assigned_ids(&role_id).unwrap(),
            [child].into_iter().collect()
        );
        assert!(
            store.parent_of(&child).unwrap().is_none(),
            "orphaned child becomes a root"
        );
    }
}
