//! Unified error types for docmeta.
//!
//! Most failures inside the extraction pipeline are recovered locally and
//! reduced to "no metadata". The variants here are the ones that escape:
//! configuration mistakes, unknown formats and handles a parser cannot use.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
