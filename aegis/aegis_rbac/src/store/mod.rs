mod in_memory;

use std::collections::HashSet;

use aegis_core::error::Result;
use aegis_core::id::{PermissionId, RoleId};

use crate::model::Permission;

/// Read contract of the permission store.
///
/// The store owns the parent/child links of the hierarchy. All
/// operations here are read-only; structural writes go through the
/// concrete store's mutation surface, which must run the hierarchy
/// validator before committing.
pub trait PermissionStore: Send + Sync {
    /// Find a permission by its ID.
    fn find_by_id(&self, id: &PermissionId) -> Result<Option<Permission>>;

    /// Find a permission by its slug.
    fn find_by_slug(&self, slug: &str) -> Result<Option<Permission>>;

    /// Find the permission guarding a route key, if one is declared.
    fn find_by_route_key(&self, route_key: &str) -> Result<Option<Permission>>;

    /// The immediate children of a permission, ordered by `order`
    /// ascending, ties broken by id.
    fn children_of(&self, id: &PermissionId) -> Result<Vec<Permission>>;

    /// The parent of a permission, if any.
    fn parent_of(&self, id: &PermissionId) -> Result<Option<Permission>>;

    /// The subset of `ids` that exist in the store.
    fn exist_all(&self, ids: &HashSet<PermissionId>) -> Result<HashSet<PermissionId>>;
}

/// Contract of the role/permission assignment set.
pub trait AssignmentStore: Send + Sync {
    /// The permission ids directly assigned to a role.
    fn assigned_ids(&self, role_id: &RoleId) -> Result<HashSet<PermissionId>>;

    /// Whether a specific permission is directly assigned to a role.
    fn is_assigned(&self, role_id: &RoleId, permission_id: &PermissionId) -> Result<bool>;

    /// Replace a role's entire assignment set.
    ///
    /// Implementations must make this a single atomic replace; two
    /// concurrent replaces for the same role must not interleave into a
    /// mixed set.
    fn replace_assignments(&self, role_id: &RoleId, ids: HashSet<PermissionId>) -> Result<()>;
}

pub use in_memory::InMemoryAuthzStore;
