//! Permission model.
//!
//! Permissions form a forest: modules contain actions (and other modules)
//! through the `parent_id` link. The slug is the stable identifier used
//! in checks; the store-assigned id is what assignment rows reference.

use aegis_core::id::PermissionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a permission node.
///
/// Modules aggregate visibility from their subtree; actions are atomic
/// capabilities that must be granted explicitly. The model does not
/// forbid an action from having children, but an action never aggregates
/// visibility from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionKind {
    /// A navigational/grouping node
    Module,
    /// An atomic capability
    Action,
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionKind::Module => write!(f, "module"),
            PermissionKind::Action => write!(f, "action"),
        }
    }
}

/// A permission node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    /// The unique ID of this permission.
    pub id: PermissionId,

    /// The display label of this permission.
    pub name: String,

    /// The globally unique, stable identifier used in checks,
    /// e.g. `"posts.edit"`.
    pub slug: String,

    /// The description of this permission.
    pub description: Option<String>,

    /// The parent permission, if any. Root permissions have none.
    pub parent_id: Option<PermissionId>,

    /// Whether this node is a module or an action.
    pub kind: PermissionKind,

    /// Opaque route key for route-based lookup.
    pub route_key: Option<String>,

    /// Display/iteration order among siblings, ascending.
    pub order: i32,

    /// Whether this permission appears in listing scopes. Resolution
    /// does not consult this flag.
    pub active: bool,

    /// When this permission was created.
    pub created_at: DateTime<Utc>,

    /// When this permission was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Create a new permission with a fresh id and no parent.
    pub fn new(name: impl Into<String>, slug: impl Into<String>, kind: PermissionKind) -> Self {
        let now = Utc::now();

        Self {
            id: PermissionId::new(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            parent_id: None,
            kind,
            route_key: None,
            order: 0,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the parent of this permission.
    pub fn with_parent(mut self, parent_id: PermissionId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the description of this permission.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the route key of this permission.
    pub fn with_route_key(mut self, route_key: impl Into<String>) -> Self {
        self.route_key = Some(route_key.into());
        self
    }

    /// Set the sibling order of this permission.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Mark this permission inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether this permission is a module.
    pub fn is_module(&self) -> bool {
        self.kind == PermissionKind::Module
    }
}
