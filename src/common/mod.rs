//! Common types shared across formats: errors, document handles and
//! content detection.

// Submodule declarations
pub mod detection;
pub mod error;
pub mod handle;

// Re-exports for convenience
pub use detection::{FormatType, detect_format, detect_format_from_bytes};
pub use error::{Error, Result};
pub use handle::FileHandle;
