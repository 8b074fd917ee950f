//! Error types for the Aegis authorization system.
//!
//! Errors are organized by subsystem, with each subsystem having its own
//! error type. The root `Error` can wrap any of the subsystem-specific
//! errors, allowing for uniform error handling at the top level.
//!
//! An unknown permission slug in a check is *not* an error; an
//! unresolvable slug is a deny.

use crate::id::PermissionId;
use thiserror::Error;

/// Root error type for the Aegis system.
#[derive(Debug, Error)]
pub enum Error {
    /// Permission hierarchy errors
    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// Assignment synchronization errors
    #[error("Assignment error: {0}")]
    Assignment(#[from] AssignmentError),

    /// Store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Resolution cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// General internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised when a structural write would violate the forest
/// invariant of the permission hierarchy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// A permission cannot be its own parent
    #[error("permission {0} cannot be its own parent")]
    SelfParent(PermissionId),

    /// The new parent lies inside the permission's own subtree
    #[error("would create a cycle: new parent {parent} is a descendant of {permission}")]
    Cycle {
        /// The permission whose parent was being changed
        permission: PermissionId,
        /// The rejected parent
        parent: PermissionId,
    },

    /// The referenced parent does not exist
    #[error("parent permission not found: {0}")]
    ParentNotFound(PermissionId),

    /// The stored hierarchy is not a forest
    #[error("hierarchy is inconsistent: {0}")]
    Inconsistent(String),
}

/// Errors raised when an assignment request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// One or more requested permission ids do not exist; the whole
    /// request is rejected, nothing is partially applied
    #[error("unknown permission ids: {0:?}")]
    UnknownPermissions(Vec<PermissionId>),
}

/// Errors raised by a permission or assignment store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Permission with the given ID was not found
    #[error("permission not found: {0}")]
    PermissionNotFound(PermissionId),

    /// A permission with the same slug already exists
    #[error("duplicate permission slug: {0}")]
    DuplicateSlug(String),

    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a resolution cache backend.
///
/// These never propagate out of a permission check; callers degrade to
/// direct computation and log the failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache backend failed or was unreachable
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Result type alias for Aegis operations.
pub type Result<T> = std::result::Result<T, Error>;
