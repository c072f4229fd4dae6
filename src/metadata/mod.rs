//! Metadata representations flowing through the pipeline: raw parser
//! output, normalized values and the canonical schema vocabulary.

pub mod raw;
pub mod schema;
pub mod value;

pub use raw::RawMetadata;
pub use schema::{FieldKind, SchemaField};
pub use value::{CanonicalMetadata, DisplayMetadata, MetadataValue};
