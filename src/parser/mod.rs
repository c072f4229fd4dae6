//! Format parsers.
//!
//! Every parser borrows a [`FileHandle`] for one [`MetadataParser::parse`]
//! call and returns [`RawMetadata`]. Unreadable or malformed sources are
//! not errors: they are logged and produce empty metadata. The only error a
//! parser raises is [`Error::IncompatibleHandle`](crate::Error) for a source
//! it cannot read from at all.

pub mod cover;
pub mod ncx;
pub mod ocf;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod stub;

pub use ocf::{OcfParser, OcfVariant};
#[cfg(feature = "pdf")]
pub use pdf::PdfParser;
pub use stub::EmptyParser;

use crate::ExtractOptions;
use crate::common::{FileHandle, Result};
use crate::metadata::RawMetadata;

/// Common parser contract.
pub trait MetadataParser {
    /// Extract raw metadata from the borrowed source.
    fn parse(&self) -> Result<RawMetadata>;
}

/// Builds the parser for one format over a borrowed handle.
pub type ParserFactory =
    for<'a> fn(&'a FileHandle, &ExtractOptions) -> Box<dyn MetadataParser + 'a>;

pub fn empty_parser<'a>(handle: &'a FileHandle, _: &ExtractOptions) -> Box<dyn MetadataParser + 'a> {
    Box::new(EmptyParser::new(handle))
}

pub fn epub_parser<'a>(handle: &'a FileHandle, options: &ExtractOptions) -> Box<dyn MetadataParser + 'a> {
    Box::new(OcfParser::new(handle, OcfVariant::Epub, options))
}

pub fn daisy_parser<'a>(handle: &'a FileHandle, options: &ExtractOptions) -> Box<dyn MetadataParser + 'a> {
    Box::new(OcfParser::new(handle, OcfVariant::Daisy, options))
}

pub fn daisy_audio_parser<'a>(
    handle: &'a FileHandle,
    options: &ExtractOptions,
) -> Box<dyn MetadataParser + 'a> {
    Box::new(OcfParser::new(handle, OcfVariant::DaisyAudio, options))
}

pub fn word_parser<'a>(handle: &'a FileHandle, options: &ExtractOptions) -> Box<dyn MetadataParser + 'a> {
    Box::new(OcfParser::new(handle, OcfVariant::Word, options))
}

#[cfg(feature = "pdf")]
pub fn pdf_parser<'a>(handle: &'a FileHandle, _: &ExtractOptions) -> Box<dyn MetadataParser + 'a> {
    Box::new(PdfParser::new(handle))
}

/// PDF support is compiled out; PDFs still register but yield no metadata.
#[cfg(not(feature = "pdf"))]
pub fn pdf_parser<'a>(handle: &'a FileHandle, options: &ExtractOptions) -> Box<dyn MetadataParser + 'a> {
    empty_parser(handle, options)
}
