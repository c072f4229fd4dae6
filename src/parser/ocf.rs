//! OCF family parser: EPUB, DAISY, DAISY-Audio and Word core properties.
//!
//! All four are ZIP packages carrying a Dublin Core style XML manifest.
//! They differ only in which entry holds the manifest and in the extras
//! read next to it (navigation file, cover image, audio count).
//!
//! Each metadata element becomes one key/value pair. The key is derived
//! from the element name or, for `<meta>`, its `name`/`property`
//! attribute:
//!
//! - the namespace prefix is dropped (`schema:accessMode` → `accessMode`),
//! - dotted compounds keep their last segment (`dtb.totalTime` → `totalTime`),
//! - camelCase becomes lower_underscore (`accessMode` → `access_mode`),
//!
//! and some attributes rewrite it: a MARC relator `role` on
//! `creator`/`contributor`, an `event` on `date`, a `scheme` on
//! `identifier`.

use phf::phf_map;
use tracing::{debug, trace, warn};

use super::MetadataParser;
use super::{cover, ncx};
use crate::ExtractOptions;
use crate::common::detection::AUDIO_EXTENSION;
use crate::common::{FileHandle, Result};
use crate::container::{XmlDocument, XmlElement, ZipContainer, parse_xml};
use crate::metadata::RawMetadata;

/// Manifest path of OOXML core document properties.
pub const CORE_PROPERTIES_PATH: &str = "docProps/core.xml";

/// MARC relator codes that get a key of their own.
static RELATORS: phf::Map<&'static str, &'static str> = phf_map! {
    "aut" => "author",
    "edt" => "editor",
};

/// Package flavour, which decides the manifest and the extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcfVariant {
    Epub,
    Daisy,
    DaisyAudio,
    Word,
}

/// Parser for ZIP + XML manifest packages.
#[derive(Debug)]
pub struct OcfParser<'a> {
    handle: &'a FileHandle,
    variant: OcfVariant,
    recursive: bool,
    include_cover: bool,
}

impl<'a> OcfParser<'a> {
    pub fn new(handle: &'a FileHandle, variant: OcfVariant, options: &ExtractOptions) -> Self {
        Self {
            handle,
            variant,
            recursive: options.recursive_lookup,
            include_cover: options.include_cover,
        }
    }

    fn parse_package(&self, container: &mut ZipContainer) -> RawMetadata {
        let Some(opf_path) = container.find_by_extension(".opf").map(str::to_string) else {
            warn!("no .opf manifest in {:?} package", self.variant);
            return RawMetadata::new();
        };
        let Some(opf_bytes) = container.read(&opf_path, false) else {
            return RawMetadata::new();
        };
        let opf = parse_xml(&opf_bytes);
        let (mut raw, cover_id) = package_metadata(&opf);

        if let Some(ncx_path) = container.find_by_extension(".ncx").map(str::to_string)
            && let Some(ncx_bytes) = container.read(&ncx_path, false)
        {
            raw.merge(ncx::ncx_metadata(&parse_xml(&ncx_bytes)));
        }

        if self.include_cover
            && let Some(data_uri) =
                cover::cover_data_uri(container, &opf, &opf_path, cover_id.as_deref(), self.recursive)
        {
            raw.insert("cover_image", data_uri);
        }

        if self.variant == OcfVariant::DaisyAudio {
            raw.insert(
                "audio_file_count",
                container.count_extension(AUDIO_EXTENSION).to_string(),
            );
        }
        raw
    }

    fn parse_core_properties(&self, container: &mut ZipContainer) -> RawMetadata {
        let Some(bytes) = container.read(CORE_PROPERTIES_PATH, self.recursive) else {
            warn!("no {CORE_PROPERTIES_PATH} in Word package");
            return RawMetadata::new();
        };
        let doc = parse_xml(&bytes);
        let mut raw = RawMetadata::new();
        if let Some(root) = doc.root() {
            walk_metadata(root, &mut raw, &mut None);
        }
        raw
    }
}

impl MetadataParser for OcfParser<'_> {
    fn parse(&self) -> Result<RawMetadata> {
        self.handle.check_compatible()?;
        let Some(mut container) = ZipContainer::open(self.handle) else {
            return Ok(RawMetadata::new());
        };

        let raw = match self.variant {
            OcfVariant::Word => self.parse_core_properties(&mut container),
            _ => self.parse_package(&mut container),
        };
        debug!("{:?} package yielded {} raw fields", self.variant, raw.len());
        Ok(raw)
    }
}

/// Metadata of an OPF package document, plus the cover item id declared by
/// `<meta name="cover">`.
pub fn package_metadata(opf: &XmlDocument) -> (RawMetadata, Option<String>) {
    let mut raw = RawMetadata::new();
    let mut cover_id = None;
    if let Some(metadata) = opf.find("//metadata") {
        walk_metadata(metadata, &mut raw, &mut cover_id);
    }
    (raw, cover_id)
}

/// Visit metadata leaves. Grouping elements without text of their own
/// (`dc-metadata`, `x-metadata` in OPF 2 DAISY books) are descended into.
fn walk_metadata(parent: &XmlElement, raw: &mut RawMetadata, cover_id: &mut Option<String>) {
    for element in parent.children() {
        if !element.children().is_empty() && element.text().is_empty() {
            walk_metadata(element, raw, cover_id);
            continue;
        }
        if element.attr("refines").is_some() {
            trace!("skipping refinement <{}>", element.name());
            continue;
        }

        if element.local_name() == "meta" {
            let Some(name) = element.attr("name").or_else(|| element.attr("property")) else {
                continue;
            };
            let value = element.attr("content").unwrap_or_else(|| element.text());
            if name == "cover" {
                *cover_id = Some(value.to_string()).filter(|id| !id.is_empty());
                continue;
            }
            if !value.is_empty() {
                raw.insert(&derive_key(name), value.trim());
            }
            continue;
        }

        let value = element.text();
        if value.is_empty() {
            continue;
        }
        let (key, value) = element_entry(element, value);
        raw.insert(&key, value);
    }
}

/// Key and value for a Dublin Core style element.
fn element_entry(element: &XmlElement, value: &str) -> (String, String) {
    // DAISY 2002 packages capitalise Dublin Core names (`dc:Creator`)
    let local = element.local_name().to_ascii_lowercase();
    match local.as_str() {
        "creator" | "contributor" => {
            let key = element
                .attr("role")
                .and_then(|role| RELATORS.get(role.trim().to_ascii_lowercase().as_str()))
                .map_or(local.as_str(), |key| *key);
            (key.to_string(), value.to_string())
        },
        "date" => {
            let key = match element.attr("event").map(str::trim) {
                Some("publication") => "publication_date",
                Some("conversion") => "produced_date",
                _ => "date",
            };
            (key.to_string(), value.to_string())
        },
        "identifier" => {
            let value = match element.attr("scheme").map(str::trim) {
                Some(scheme) if !scheme.is_empty() => scheme_prefixed(scheme, value),
                _ => value.to_string(),
            };
            ("identifier".to_string(), value)
        },
        _ => (derive_key(element.name()), value.to_string()),
    }
}

/// `scheme:value`, unless the value already carries the scheme.
fn scheme_prefixed(scheme: &str, value: &str) -> String {
    let scheme = scheme.to_ascii_lowercase();
    let lowered = value.to_ascii_lowercase();
    let bare = if lowered.starts_with(&format!("urn:{scheme}:")) {
        &value[scheme.len() + 5..]
    } else if lowered.starts_with(&format!("{scheme}:")) {
        &value[scheme.len() + 1..]
    } else {
        value
    };
    format!("{scheme}:{}", bare.trim())
}

/// Raw key for a metadata name: prefix dropped, last dotted segment,
/// lower_underscore.
pub fn derive_key(name: &str) -> String {
    let local = name.rsplit_once(':').map_or(name, |(_, local)| local);
    let last = local.rsplit_once('.').map_or(local, |(_, last)| last);
    snake_case(last)
}

/// camelCase / kebab-case → lower_underscore. Acronym runs stay together:
/// `ISBNNumber` → `isbn_number`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if (prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower))
                && !out.ends_with('_')
            {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
