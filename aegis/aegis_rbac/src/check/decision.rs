//! Tagged permission-check outcome.

use serde::Serialize;

/// Why a permission check granted or denied.
///
/// The public boolean contract collapses this tag, but keeping it
/// explicit makes the grant paths individually observable and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    /// The role is the configured master role; all checks pass.
    Bypass,

    /// The permission id is directly assigned to the role.
    DirectGrant,

    /// The permission is a module and at least one permission in its
    /// subtree is directly assigned to the role.
    DescendantGrant,

    /// No grant path applies (including an unknown slug).
    Deny,
}

impl Decision {
    /// Collapse to the boolean contract.
    pub fn is_granted(&self) -> bool {
        !matches!(self, Decision::Deny)
    }
}
