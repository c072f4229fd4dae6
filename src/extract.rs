//! Metadata extraction entry point.
//!
//! [`MetadataExtractor`] ties the pipeline together: it settles the format
//! of a document, runs that format's parser and normalizes the raw result
//! into canonical and display metadata.

use tracing::debug;

use crate::ExtractOptions;
use crate::common::{Error, FileHandle, FormatType, Result};
use crate::metadata::{CanonicalMetadata, DisplayMetadata, RawMetadata};
use crate::normalize::{format_metadata, mapped_metadata};
use crate::registry::{FormatDescriptor, FormatRegistry};

/// What an upload tells us about its format, besides its content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadHint {
    /// Format tag chosen explicitly by the uploader
    pub format: Option<FormatType>,
    /// Declared `Content-Type`
    pub mime_type: Option<String>,
    /// Original file name
    pub filename: Option<String>,
}

impl UploadHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: FormatType) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Declared format: the explicit tag, else the MIME type, else the file
    /// name's extension.
    pub fn declared_format(&self, registry: &FormatRegistry) -> Option<FormatType> {
        self.format
            .or_else(|| self.mime_type.as_deref().and_then(|m| registry.format_by_mime(m)))
            .or_else(|| self.filename.as_deref().and_then(|f| registry.format_for_filename(f)))
    }
}

/// Parser output of one document together with its format.
///
/// The canonical and display forms are computed on request.
#[derive(Debug)]
pub struct Extraction<'e> {
    descriptor: &'e FormatDescriptor,
    options: &'e ExtractOptions,
    raw: RawMetadata,
}

impl Extraction<'_> {
    pub fn format(&self) -> FormatType {
        self.descriptor.format
    }

    pub fn raw(&self) -> &RawMetadata {
        &self.raw
    }

    pub fn canonical(&self) -> CanonicalMetadata {
        mapped_metadata(&self.raw, self.descriptor, self.options)
    }

    pub fn display(&self) -> DisplayMetadata {
        format_metadata(&self.raw, self.descriptor, self.options)
    }
}

/// Runs detection, parsing and normalization against a format registry.
///
/// # Examples
///
/// ```rust,no_run
/// use docmeta::{FileHandle, FormatType, MetadataExtractor};
///
/// let extractor = MetadataExtractor::new()?;
/// let handle = FileHandle::from_path("book.epub");
///
/// let canonical = extractor.extract_metadata(&handle, Some(FormatType::Epub))?;
/// println!("{}", canonical.to_yaml()?);
///
/// // Labelled values for presentation
/// for (label, value) in extractor.display_metadata(&handle, None)?.iter() {
///     println!("{label}: {value:?}");
/// }
/// # Ok::<(), docmeta::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MetadataExtractor<'r> {
    registry: &'r FormatRegistry,
    options: ExtractOptions,
}

impl MetadataExtractor<'static> {
    /// Extractor over the process-wide registry with default options.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(FormatRegistry::global()?))
    }
}

impl<'r> MetadataExtractor<'r> {
    pub fn with_registry(registry: &'r FormatRegistry) -> Self {
        Self {
            registry,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &FormatRegistry {
        self.registry
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Canonical metadata of a document.
    ///
    /// `declared` is the format the caller believes the document has; it is
    /// refined for ambiguous formats and detected from the content when
    /// absent.
    pub fn extract_metadata(
        &self,
        handle: &FileHandle,
        declared: Option<FormatType>,
    ) -> Result<CanonicalMetadata> {
        Ok(self.run(handle, declared)?.canonical())
    }

    /// Labelled metadata of a document, in the format's display order.
    pub fn display_metadata(
        &self,
        handle: &FileHandle,
        declared: Option<FormatType>,
    ) -> Result<DisplayMetadata> {
        Ok(self.run(handle, declared)?.display())
    }

    /// Parse an uploaded document, declaring its format from `hint`.
    pub fn extract(&self, handle: &FileHandle, hint: &UploadHint) -> Result<Extraction<'_>> {
        let mut declared = hint.declared_format(self.registry);
        if declared.is_none()
            && let Some(name) = handle.file_name()
        {
            declared = self.registry.format_for_filename(name);
        }
        self.run(handle, declared)
    }

    /// Run `format`'s parser over `handle`.
    pub fn parse(&self, format: FormatType, handle: &FileHandle) -> Result<RawMetadata> {
        self.descriptor(format)?
            .create_parser(handle, &self.options)
            .parse()
    }

    /// Canonical metadata of already parsed raw metadata.
    pub fn normalize(&self, raw: &RawMetadata, descriptor: &FormatDescriptor) -> CanonicalMetadata {
        mapped_metadata(raw, descriptor, &self.options)
    }

    /// Display metadata of already parsed raw metadata.
    pub fn display(&self, raw: &RawMetadata, descriptor: &FormatDescriptor) -> DisplayMetadata {
        format_metadata(raw, descriptor, &self.options)
    }

    fn descriptor(&self, format: FormatType) -> Result<&'r FormatDescriptor> {
        self.registry
            .descriptor_for(format)
            .ok_or_else(|| Error::UnknownFormat(format!("no descriptor registered for '{format}'")))
    }

    fn run(&self, handle: &FileHandle, declared: Option<FormatType>) -> Result<Extraction<'_>> {
        let format = self
            .registry
            .resolve_type(declared, Some(handle))
            .ok_or_else(|| Error::UnknownFormat("document format could not be identified".to_string()))?;
        let descriptor = self.descriptor(format)?;
        let raw = descriptor.create_parser(handle, &self.options).parse()?;

        debug!(
            "extracted {} raw fields as '{format}' (declared {declared:?})",
            raw.len()
        );
        Ok(Extraction {
            descriptor,
            options: &self.options,
            raw,
        })
    }
}
