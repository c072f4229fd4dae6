//! Format registry.
//!
//! The registry is the static table from [`FormatType`] to
//! [`FormatDescriptor`], plus reverse lookups by MIME type and file
//! extension. It is built during startup and read-only afterwards; the
//! reverse lookup maps are computed on first use.
//!
//! # Examples
//!
//! ```rust
//! use docmeta::common::FormatType;
//! use docmeta::registry::FormatRegistry;
//!
//! let registry = FormatRegistry::builtin()?;
//! assert_eq!(registry.format_by_extension(".EPUB"), Some(FormatType::Epub));
//! assert_eq!(registry.format_by_mime("application/pdf; charset=binary"), Some(FormatType::Pdf));
//! # Ok::<(), docmeta::Error>(())
//! ```

pub mod config;
pub mod descriptor;
pub mod formats;

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

pub use config::{FormatConfig, RegistryConfig};
pub use descriptor::FormatDescriptor;
pub use formats::{BUILTIN_CONFIG, base_descriptor, builtin_descriptors};

use crate::common::detection::{daisy_variant, detect_format};
use crate::common::{Error, FileHandle, FormatType, Result};
use crate::container::ZipContainer;

static GLOBAL: OnceCell<FormatRegistry> = OnceCell::new();

/// Lookup table of registered formats.
#[derive(Debug, Default)]
pub struct FormatRegistry {
    descriptors: Vec<FormatDescriptor>,
    by_extension: OnceCell<HashMap<String, FormatType>>,
    by_mime: OnceCell<HashMap<String, FormatType>>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of every built-in format.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in builtin_descriptors()? {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Built-in formats with host overrides applied.
    pub fn with_config(config: &RegistryConfig) -> Result<Self> {
        let mut descriptors = builtin_descriptors()?;
        config.apply(&mut descriptors)?;
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// The process-wide registry, built from the built-in formats on first
    /// use unless [`install_global`](Self::install_global) ran earlier.
    pub fn global() -> Result<&'static FormatRegistry> {
        GLOBAL.get_or_try_init(Self::builtin)
    }

    /// Install `registry` as the process-wide registry.
    ///
    /// Must run once during startup, before the first extraction.
    pub fn install_global(registry: FormatRegistry) -> Result<()> {
        GLOBAL
            .set(registry)
            .map_err(|_| Error::Config("global format registry is already initialised".to_string()))
    }

    /// Register a format.
    ///
    /// The descriptor is validated first. Registering a format again
    /// replaces the earlier descriptor in place, keeping its position for
    /// reverse lookup ties.
    pub fn register(&mut self, descriptor: FormatDescriptor) -> Result<()> {
        descriptor.validate()?;
        match self.descriptors.iter_mut().find(|d| d.format == descriptor.format) {
            Some(existing) => {
                debug!("replacing descriptor for '{}'", descriptor.format);
                *existing = descriptor;
            },
            None => {
                trace!("registering '{}'", descriptor.format);
                self.descriptors.push(descriptor);
            },
        }
        self.by_extension = OnceCell::new();
        self.by_mime = OnceCell::new();
        Ok(())
    }

    /// Descriptor of a registered format.
    pub fn descriptor_for(&self, format: FormatType) -> Option<&FormatDescriptor> {
        self.descriptors.iter().find(|d| d.format == format)
    }

    /// Registered descriptors in registration order.
    pub fn descriptors(&self) -> &[FormatDescriptor] {
        &self.descriptors
    }

    /// Registered formats in registration order.
    pub fn formats(&self) -> impl Iterator<Item = FormatType> + '_ {
        self.descriptors.iter().map(|d| d.format)
    }

    /// Settle the format of a document.
    ///
    /// Without a handle the declared format is returned as is. A declared
    /// DAISY or DAISY-Audio format is re-checked against the container: any
    /// `.mp3` entry makes it DAISY-Audio. This inherited heuristic cannot
    /// tell an audio book from a text book with an incidental audio clip.
    /// With nothing declared, the format is detected from the content.
    pub fn resolve_type(
        &self,
        declared: Option<FormatType>,
        handle: Option<&FileHandle>,
    ) -> Option<FormatType> {
        let Some(handle) = handle else {
            return declared;
        };
        match declared {
            Some(FormatType::Daisy | FormatType::DaisyAudio) => {
                let resolved = ZipContainer::open(handle)
                    .map(|container| daisy_variant(&container))
                    .or(declared);
                trace!("DAISY variant check: {declared:?} -> {resolved:?}");
                resolved
            },
            Some(format) => Some(format),
            None => detect_format(handle),
        }
    }

    /// Format registered for a file extension. Case and a leading dot are
    /// ignored; on ties the first-registered format wins.
    pub fn format_by_extension(&self, ext: &str) -> Option<FormatType> {
        let key = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        self.extension_map().get(&key).copied()
    }

    /// Format registered for a MIME type. Case and parameters
    /// (`; charset=…`) are ignored; on ties the first-registered format wins.
    pub fn format_by_mime(&self, mime: &str) -> Option<FormatType> {
        self.mime_map().get(&normalize_mime(mime)).copied()
    }

    /// Format of a file name, by its extension.
    pub fn format_for_filename(&self, filename: &str) -> Option<FormatType> {
        let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        let (_, ext) = name.rsplit_once('.')?;
        self.format_by_extension(ext)
    }

    fn extension_map(&self) -> &HashMap<String, FormatType> {
        self.by_extension.get_or_init(|| {
            let mut map = HashMap::new();
            for descriptor in &self.descriptors {
                for ext in &descriptor.file_extensions {
                    map.entry(ext.trim_start_matches('.').to_ascii_lowercase())
                        .or_insert(descriptor.format);
                }
            }
            map
        })
    }

    fn mime_map(&self) -> &HashMap<String, FormatType> {
        self.by_mime.get_or_init(|| {
            let mut map = HashMap::new();
            for descriptor in &self.descriptors {
                for mime in &descriptor.mime_types {
                    map.entry(normalize_mime(mime)).or_insert(descriptor.format);
                }
            }
            map
        })
    }
}

fn normalize_mime(mime: &str) -> String {
    mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}
