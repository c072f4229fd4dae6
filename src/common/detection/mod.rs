//! Document format detection.
//!
//! Detection is based on file signatures (magic numbers) and, for ZIP
//! packages, on the entries the package contains. Only the minimal amount
//! of data needed for identification is read.

// Submodule declarations
pub mod brf;
pub mod functions;
pub mod ole2;
pub mod package;
pub mod pdf;
pub mod rtf;
pub mod types;
pub mod utils;

// Re-exports
pub use functions::{detect_format, detect_format_from_bytes, detect_format_from_path};
pub use package::{AUDIO_EXTENSION, daisy_variant};
pub use types::FormatType;
