//! Docmeta - metadata extraction for digital library documents
//!
//! This library identifies the format of an uploaded document and turns
//! whatever metadata it carries into two normalized forms: a canonical
//! record keyed by a shared schema vocabulary (for indexing), and an
//! ordered list of labelled values (for display).
//!
//! # Features
//!
//! - **Format detection**: EPUB, DAISY, DAISY-Audio, PDF, Word, BRF and RTF
//!   recognised from content; every supported format by MIME type or file
//!   extension
//! - **OCF packages**: OPF manifest, NCX navigation file and cover image of
//!   EPUB and DAISY books; core properties of Word documents
//! - **PDF**: document information dictionary and catalog flags
//!   (`pdf` feature, enabled by default)
//! - **Normalization**: dates, publication identifiers and language codes
//!   normalized per field, with labels and value shapes derived from a
//!   declarative per-format field table
//! - **Graceful degradation**: unreadable or malformed documents yield
//!   empty metadata instead of errors
//!
//! # Example - Extracting metadata
//!
//! ```no_run
//! use docmeta::{FileHandle, FormatType, MetadataExtractor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = MetadataExtractor::new()?;
//! let handle = FileHandle::from_path("book.epub");
//!
//! // Canonical record for the search index
//! let record = extractor.extract_metadata(&handle, Some(FormatType::Epub))?;
//! println!("{}", serde_json::to_string(&record)?);
//!
//! // Labelled values for a details page
//! let display = extractor.display_metadata(&handle, Some(FormatType::Epub))?;
//! for (label, value) in display.iter() {
//!     println!("{label}: {value:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Format detection
//!
//! ```
//! use docmeta::{FormatType, detect_format_from_bytes};
//!
//! assert_eq!(detect_format_from_bytes(b"%PDF-1.7\n"), Some(FormatType::Pdf));
//! assert_eq!(detect_format_from_bytes(b"{\\rtf1\\ansi}"), Some(FormatType::Rtf));
//! ```

/// Errors, document handles and content detection
pub mod common;

/// ZIP entry access and namespace-tolerant XML trees
pub mod container;

/// Dispatcher over the registry, parsers and normalization
pub mod extract;

/// Raw, canonical and display metadata types
pub mod metadata;

/// Field normalization: accessors, transforms and labels
pub mod normalize;

/// Extraction options
pub mod options;

/// Format parsers
pub mod parser;

/// Format descriptors and the format registry
pub mod registry;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use common::{Error, FileHandle, FormatType, Result, detect_format, detect_format_from_bytes};
pub use extract::{Extraction, MetadataExtractor, UploadHint};
pub use metadata::{CanonicalMetadata, DisplayMetadata, MetadataValue, RawMetadata, SchemaField};
pub use options::ExtractOptions;
pub use registry::{FormatDescriptor, FormatRegistry, RegistryConfig};
