//! Forest invariant enforcement for structural writes.
//!
//! Every creation or change of a permission's `parent_id` must pass
//! through [`validate_parent_assignment`] before the write commits. A
//! committed cycle would make descendant resolution non-terminating, so
//! this is a pre-commit gate, not a read-time audit.

use aegis_core::error::{HierarchyError, Result};
use aegis_core::id::PermissionId;

use super::resolver::descendant_ids;
use crate::store::PermissionStore;

/// Validate that assigning `new_parent_id` as the parent of
/// `permission_id` keeps the hierarchy a forest.
///
/// `permission_id` is `None` when the permission is being created and
/// has no store-assigned id yet; a fresh node has no subtree, so only
/// existing nodes need the descendant check.
pub fn validate_parent_assignment(
    store: &dyn PermissionStore,
    permission_id: Option<PermissionId>,
    new_parent_id: Option<PermissionId>,
) -> Result<()> {
    let Some(parent_id) = new_parent_id else {
        // Detaching to a root is always structurally safe.
        return Ok(());
    };

    let Some(permission_id) = permission_id else {
        return Ok(());
    };

    if parent_id == permission_id {
        return Err(HierarchyError::SelfParent(permission_id).into());
    }

    if store.find_by_id(&permission_id)?.is_some()
        && descendant_ids(store, permission_id)?.contains(&parent_id)
    {
        return Err(HierarchyError::Cycle {
            permission: permission_id,
            parent: parent_id,
        }
        .into());
    }

    Ok(())
}
