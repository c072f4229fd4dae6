//! YAML configuration of format descriptors.
//!
//! The MIME types, file extensions and field maps of the built-in formats
//! live in `formats.yaml`. A host can supply overrides of the same shape:
//!
//! ```yaml
//! formats:
//!   pdf:
//!     mime_types: [application/pdf, application/x-pdf]
//!     field_map:
//!       Title: dc_title
//! ```
//!
//! Each key present replaces the descriptor's value wholesale. Field map
//! entries follow the field table's order, whatever order the YAML uses.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use super::FormatDescriptor;
use crate::common::{Error, FormatType, Result};
use crate::metadata::SchemaField;

/// Configuration document: per-format overrides keyed by format tag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub formats: BTreeMap<String, FormatConfig>,
}

/// Override for one format. Absent keys leave the descriptor untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub mime_types: Option<Vec<String>>,
    pub file_extensions: Option<Vec<String>>,
    pub field_map: Option<BTreeMap<String, SchemaField>>,
}

impl RegistryConfig {
    /// Parse a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("invalid format configuration: {e}")))
    }

    /// Override for `format`, if configured.
    ///
    /// Tags are matched the way [`FormatType`] parses them, so `daisy_audio`
    /// and `daisyAudio` name the same format.
    pub fn format_config(&self, format: FormatType) -> Option<&FormatConfig> {
        self.formats
            .iter()
            .find(|(tag, _)| tag.parse::<FormatType>().is_ok_and(|parsed| parsed == format))
            .map(|(_, config)| config)
    }

    /// Apply the overrides to `descriptors`.
    ///
    /// Every configured tag must name a known format that has a descriptor.
    pub fn apply(&self, descriptors: &mut [FormatDescriptor]) -> Result<()> {
        for (tag, config) in &self.formats {
            let format: FormatType = tag
                .parse()
                .map_err(|_| Error::Config(format!("unknown format '{tag}' in configuration")))?;
            let descriptor = descriptors
                .iter_mut()
                .find(|descriptor| descriptor.format == format)
                .ok_or_else(|| Error::Config(format!("format '{tag}' is not registered")))?;
            config.apply_to(descriptor)?;
        }
        Ok(())
    }
}

impl FormatConfig {
    /// Apply this override to one descriptor.
    pub fn apply_to(&self, descriptor: &mut FormatDescriptor) -> Result<()> {
        if let Some(mime_types) = &self.mime_types {
            descriptor.mime_types = mime_types.clone();
        }
        if let Some(extensions) = &self.file_extensions {
            descriptor.file_extensions = extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect();
        }
        if let Some(field_map) = &self.field_map {
            if let Some(field) = field_map
                .keys()
                .find(|field| descriptor.accessor_for(field).is_none())
            {
                return Err(Error::Config(format!(
                    "format '{}' maps field '{field}' which has no extraction rule",
                    descriptor.format
                )));
            }
            descriptor.field_map = descriptor
                .field_table
                .iter()
                .filter_map(|(field, _)| field_map.get(field).map(|target| (field.clone(), *target)))
                .collect();
        }
        debug!("configured format '{}'", descriptor.format);
        Ok(())
    }
}
