//! Descendant and ancestor resolution over the permission hierarchy.
//!
//! Traversal is worklist-based over the store's child relation rather
//! than call-stack recursion, so deep hierarchies cannot exhaust the
//! stack and the visited-set cycle guard is explicit. A forest never
//! revisits a node; if the store is corrupt and one shows up twice, the
//! descendant walk treats the revisit as a no-op while the ancestor walk
//! surfaces an inconsistency error, since a cyclic ancestor chain has no
//! meaningful partial answer.

use std::collections::{HashSet, VecDeque};

use aegis_core::error::{HierarchyError, Result};
use aegis_core::id::PermissionId;

use crate::model::{Permission, PermissionTreeNode};
use crate::store::PermissionStore;

/// Compute the full descendant id set of a permission.
///
/// Returns the empty set for leaves. The starting permission is never a
/// member of its own descendant set.
pub fn descendant_ids(
    store: &dyn PermissionStore,
    id: PermissionId,
) -> Result<HashSet<PermissionId>> {
    let mut visited = HashSet::new();
    visited.insert(id);

    let mut descendants = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(id);

    while let Some(current) = queue.pop_front() {
        for child in store.children_of(&current)? {
            if visited.insert(child.id) {
                descendants.insert(child.id);
                queue.push_back(child.id);
            }
        }
    }

    Ok(descendants)
}

/// Walk the ancestor chain of a permission, nearest parent first, root
/// last.
pub fn ancestors(store: &dyn PermissionStore, id: PermissionId) -> Result<Vec<Permission>> {
    let mut visited = HashSet::new();
    visited.insert(id);

    let mut chain = Vec::new();
    let mut current = id;

    while let Some(parent) = store.parent_of(&current)? {
        if !visited.insert(parent.id) {
            return Err(HierarchyError::Inconsistent(format!(
                "ancestor chain of {} revisits {}",
                id, parent.id
            ))
            .into());
        }
        current = parent.id;
        chain.push(parent);
    }

    Ok(chain)
}

/// Assemble the nested tree rooted at a permission.
///
/// Returns `None` when the root does not exist. Children appear in
/// sibling order; a corrupt store cannot make a node appear twice.
pub fn to_tree(
    store: &dyn PermissionStore,
    root: PermissionId,
) -> Result<Option<PermissionTreeNode>> {
    let Some(permission) = store.find_by_id(&root)? else {
        return Ok(None);
    };

    let mut visited = HashSet::new();
    visited.insert(root);

    Ok(Some(build_node(store, &permission, &mut visited)?))
}

fn build_node(
    store: &dyn PermissionStore,
    permission: &Permission,
    visited: &mut HashSet<PermissionId>,
) -> Result<PermissionTreeNode> {
    let mut node = PermissionTreeNode::leaf(permission);

    for child in store.children_of(&permission.id)? {
        if visited.insert(child.id) {
            node.children.push(build_node(store, &child, visited)?);
        }
    }

    Ok(node)
}
