//! # Aegis Core
//!
//! `aegis_core` provides the fundamental building blocks for the Aegis
//! authorization system: error types, strongly-typed identifiers, and the
//! resolution configuration value shared by the higher-level crates.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all Aegis components
//! - **id**: Strongly-typed identifier types
//! - **config**: Explicit configuration passed into resolver constructors

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod id;

// Re-export key types for convenience
pub use config::ResolutionConfig;
pub use error::{AssignmentError, CacheError, Error, HierarchyError, Result, StoreError};
pub use id::{PermissionId, RoleId};
