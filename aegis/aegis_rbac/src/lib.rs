//! # Aegis RBAC
//!
//! This crate implements the Aegis role/permission resolution core.
//! Permissions form a forest (modules containing actions, arbitrarily
//! deep) and roles hold an explicit set of directly-assigned permission
//! ids. Resolution grants a slug to a role through one of three paths:
//! a master-role bypass, a direct assignment, or (for module
//! permissions only) a directly-assigned descendant.
//!
//! ## Core Components
//!
//! - **Model**: Permission, Role, and tree-view types
//! - **Store**: The store traits plus an in-memory implementation
//! - **Hierarchy**: Cycle-safe structural validation and
//!   descendant/ancestor resolution
//! - **Check**: The permission checking engine and its decision tag
//! - **Sync**: Atomic replacement of a role's assignment set
//! - **Cache**: Memoized resolution outcomes with scoped invalidation
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use aegis_core::ResolutionConfig;
//! use aegis_rbac::check::PermissionChecker;
//! use aegis_rbac::model::{Permission, PermissionKind, Role};
//! use aegis_rbac::store::InMemoryAuthzStore;
//! use aegis_rbac::sync::AssignmentSynchronizer;
//!
//! let store = Arc::new(InMemoryAuthzStore::new());
//!
//! // A module with one action inside it.
//! let posts = Permission::new("Posts", "posts", PermissionKind::Module);
//! let posts_id = store.insert(posts).unwrap();
//! let edit = Permission::new("Edit", "posts.edit", PermissionKind::Action)
//!     .with_parent(posts_id);
//! let edit_id = store.insert(edit).unwrap();
//!
//! let config = ResolutionConfig::default();
//! let checker = PermissionChecker::new(store.clone(), store.clone(), config.clone());
//! let sync = AssignmentSynchronizer::new(store.clone(), store.clone(), config);
//!
//! // Granting the action makes its containing module visible.
//! let editors = Role::new("Editors", "editors");
//! sync.sync_permissions(&editors, [edit_id].into_iter().collect(), false)
//!     .unwrap();
//!
//! assert!(checker.has_permission(&editors, "posts.edit").unwrap());
//! assert!(checker.has_permission(&editors, "posts").unwrap());
//! ```

#![forbid(unsafe_code)]

pub mod cache;
pub mod check;
pub mod hierarchy;
pub mod model;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use cache::{InMemoryResolutionCache, ResolutionCache};
pub use check::{Decision, PermissionChecker};
pub use model::{Permission, PermissionKind, PermissionTreeNode, Role};
pub use store::{AssignmentStore, InMemoryAuthzStore, PermissionStore};
pub use sync::AssignmentSynchronizer;
