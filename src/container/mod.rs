//! Container access: ZIP entry lookup and namespace-tolerant XML trees.
//!
//! EPUB, DAISY, DAISY-Audio and Word documents are all ZIP packages holding
//! XML manifests. They differ only in which entries they look for and which
//! vocabulary those entries use, so the traversal mechanics live here and
//! know nothing about document semantics.
//!
//! Nothing in this module raises. A missing entry, an unreadable archive or a
//! malformed XML document is logged and reduced to an empty result.

pub mod archive;
pub mod xml;

pub use archive::{
    ZipContainer, entry_names, find_entry_path_by_extension, has_entry_with_extension,
    read_entry,
};
pub use xml::{XmlDocument, XmlElement, parse_xml};
