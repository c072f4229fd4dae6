//! Per-format descriptors.
//!
//! A [`FormatDescriptor`] is the declarative description of one format:
//! how to recognise it, how to parse it, which display fields it offers
//! and how those map onto the canonical schema.

use std::collections::HashSet;
use std::fmt;

use crate::ExtractOptions;
use crate::common::{Error, FileHandle, FormatType, Result};
use crate::metadata::SchemaField;
use crate::normalize::{AccessorSpec, FieldTransform};
use crate::parser::{MetadataParser, ParserFactory};

/// Everything the pipeline needs to know about one format.
#[derive(Clone)]
pub struct FormatDescriptor {
    pub format: FormatType,
    /// MIME types, preferred first
    pub mime_types: Vec<String>,
    /// File extensions without the leading dot, preferred first
    pub file_extensions: Vec<String>,
    /// Display fields in output order
    pub field_table: Vec<(String, AccessorSpec)>,
    /// Display field → canonical schema field
    pub field_map: Vec<(String, SchemaField)>,
    /// Transforms keyed by the accessor that produced a value
    pub accessor_transforms: Vec<(String, FieldTransform)>,
    pub parser: ParserFactory,
}

impl FormatDescriptor {
    pub fn new(format: FormatType, parser: ParserFactory) -> Self {
        Self {
            format,
            mime_types: Vec::new(),
            file_extensions: Vec::new(),
            field_table: Vec::new(),
            field_map: Vec::new(),
            accessor_transforms: Vec::new(),
            parser,
        }
    }

    pub fn with_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types = mime_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Append a display field.
    pub fn with_field(mut self, field: impl Into<String>, spec: impl Into<AccessorSpec>) -> Self {
        self.field_table.push((field.into(), spec.into()));
        self
    }

    /// Map a display field onto a canonical schema field.
    pub fn map_field(mut self, field: impl Into<String>, schema_field: SchemaField) -> Self {
        self.field_map.push((field.into(), schema_field));
        self
    }

    /// Transform values produced by the accessor `name`.
    pub fn with_accessor_transform(mut self, name: impl Into<String>, transform: FieldTransform) -> Self {
        self.accessor_transforms.push((name.into(), transform));
        self
    }

    /// Check the descriptor's internal consistency.
    pub fn validate(&self) -> Result<()> {
        let tag = self.format;
        if self.mime_types.is_empty() {
            return Err(Error::Config(format!("format '{tag}' declares no MIME type")));
        }
        if self.mime_types.iter().any(|m| m.trim().is_empty()) {
            return Err(Error::Config(format!("format '{tag}' declares a blank MIME type")));
        }
        if self.file_extensions.is_empty() {
            return Err(Error::Config(format!("format '{tag}' declares no file extension")));
        }
        if self.file_extensions.iter().any(|e| e.trim().trim_start_matches('.').is_empty()) {
            return Err(Error::Config(format!("format '{tag}' declares a blank file extension")));
        }

        let mut seen = HashSet::new();
        for (field, _) in &self.field_table {
            if !seen.insert(field.as_str()) {
                return Err(Error::Config(format!(
                    "format '{tag}' lists field '{field}' twice"
                )));
            }
        }
        for (field, _) in &self.field_map {
            if !seen.contains(field.as_str()) {
                return Err(Error::Config(format!(
                    "format '{tag}' maps field '{field}' which has no extraction rule"
                )));
            }
        }
        Ok(())
    }

    /// Extraction rule of a display field.
    pub fn accessor_for(&self, field: &str) -> Option<&AccessorSpec> {
        self.field_table
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, spec)| spec)
    }

    pub fn transform_for_accessor(&self, accessor: &str) -> Option<FieldTransform> {
        self.accessor_transforms
            .iter()
            .find(|(name, _)| name == accessor)
            .map(|(_, transform)| *transform)
    }

    pub fn preferred_mime_type(&self) -> Option<&str> {
        self.mime_types.first().map(String::as_str)
    }

    pub fn preferred_extension(&self) -> Option<&str> {
        self.file_extensions.first().map(String::as_str)
    }

    /// Build this format's parser over `handle`.
    pub fn create_parser<'a>(
        &self,
        handle: &'a FileHandle,
        options: &ExtractOptions,
    ) -> Box<dyn MetadataParser + 'a> {
        (self.parser)(handle, options)
    }
}

impl fmt::Debug for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatDescriptor")
            .field("format", &self.format)
            .field("mime_types", &self.mime_types)
            .field("file_extensions", &self.file_extensions)
            .field("fields", &self.field_table.len())
            .field("mapped", &self.field_map.len())
            .finish()
    }
}
