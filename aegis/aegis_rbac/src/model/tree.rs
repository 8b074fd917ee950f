//! Nested tree view of the permission hierarchy.

use aegis_core::id::PermissionId;
use serde::Serialize;

use super::{Permission, PermissionKind};

/// A permission with its children nested inside it, for rendering the
/// hierarchy as a whole (sidebars, administrative trees).
///
/// Inactive nodes are included and carry their `active` flag; filtering
/// is a listing concern left to the consumer.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionTreeNode {
    /// The ID of this permission.
    pub id: PermissionId,

    /// The display label.
    pub name: String,

    /// The stable check identifier.
    pub slug: String,

    /// Module or action.
    pub kind: PermissionKind,

    /// Opaque route key, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_key: Option<String>,

    /// Sibling order.
    pub order: i32,

    /// Whether this permission is active.
    pub active: bool,

    /// Child nodes, ordered by `order` ascending.
    pub children: Vec<PermissionTreeNode>,
}

impl PermissionTreeNode {
    /// Build a childless node from a permission record.
    pub fn leaf(permission: &Permission) -> Self {
        Self {
            id: permission.id,
            name: permission.name.clone(),
            slug: permission.slug.clone(),
            kind: permission.kind,
            route_key: permission.route_key.clone(),
            order: permission.order,
            active: permission.active,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_copies_fields() {
        let permission = Permission::new("Posts", "posts", PermissionKind::Module)
            .with_route_key("posts.index")
            .with_order(2);
        let node = PermissionTreeNode::leaf(&permission);

        assert_eq!(node.id, permission.id);
        assert_eq!(node.slug, "posts");
        assert_eq!(node.order, 2);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_serializes_nested_shape() {
        let parent = Permission::new("Posts", "posts", PermissionKind::Module);
        let child = Permission::new("Edit", "posts.edit", PermissionKind::Action);

        let mut node = PermissionTreeNode::leaf(&parent);
        node.children.push(PermissionTreeNode::leaf(&child));

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["slug"], "posts");
        assert_eq!(json["children"][0]["slug"], "posts.edit");
        assert_eq!(json["children"][0]["kind"], "Action");
    }
}
