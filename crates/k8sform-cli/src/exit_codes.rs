//! Exit codes for CLI operations
//!
//! These follow Unix conventions and sysexits.h where applicable.

/// Operation completed without errors
pub const SUCCESS: i32 = 0;

/// Unspecified failure
pub const ERROR: i32 = 1;

/// Configuration failed validation, or a plan was rejected
pub const VALIDATION_ERROR: i32 = 2;

/// Unknown type name, or CRD files that cannot be loaded
pub const CATALOG_ERROR: i32 = 3;

/// Example files are missing or stale
pub const EXAMPLES_ERROR: i32 = 4;

/// File not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// The cluster rejected or failed an operation
pub const CLUSTER_ERROR: i32 = 6;
