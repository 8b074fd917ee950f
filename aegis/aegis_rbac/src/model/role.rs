//! Role model.

use aegis_core::id::RoleId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A role that permissions are assigned to.
///
/// Roles are created and managed by an external administrative surface;
/// the core only reads them. One configured slug is the master role,
/// which bypasses all checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// The unique ID of this role.
    pub id: RoleId,

    /// The display name of this role.
    pub name: String,

    /// The unique, stable identifier of this role.
    pub slug: String,

    /// The description of this role.
    pub description: Option<String>,

    /// Whether this role is active.
    pub active: bool,

    /// When this role was created.
    pub created_at: DateTime<Utc>,

    /// When this role was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Create a new role with a fresh id.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: RoleId::new(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description of this role.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
