//! Built-in format descriptors.
//!
//! Field tables and accessor transforms are declared here; MIME types,
//! extensions and field maps come from the embedded `formats.yaml`.

use super::{FormatDescriptor, RegistryConfig};
use crate::common::{FormatType, Result};
use crate::metadata::RawMetadata;
use crate::normalize::{AccessorSpec, FieldTransform};
use crate::parser;

/// Embedded configuration of the built-in formats.
pub const BUILTIN_CONFIG: &str = include_str!("formats.yaml");

/// Descriptors of every built-in format, configured and validated, in
/// [`FormatType::ALL`] order.
pub fn builtin_descriptors() -> Result<Vec<FormatDescriptor>> {
    let mut descriptors: Vec<FormatDescriptor> =
        FormatType::ALL.iter().map(|format| base_descriptor(*format)).collect();
    RegistryConfig::from_yaml_str(BUILTIN_CONFIG)?.apply(&mut descriptors)?;
    for descriptor in &descriptors {
        descriptor.validate()?;
    }
    Ok(descriptors)
}

/// Field table, transforms and parser of `format`, without configuration.
pub fn base_descriptor(format: FormatType) -> FormatDescriptor {
    match format {
        FormatType::Epub => ocf_fields(FormatDescriptor::new(format, parser::epub_parser)),
        FormatType::Daisy => daisy_fields(FormatDescriptor::new(format, parser::daisy_parser)),
        FormatType::DaisyAudio => {
            daisy_fields(FormatDescriptor::new(format, parser::daisy_audio_parser))
                .with_field("AudioFileCount", "audio_file_count")
        },
        FormatType::Pdf => pdf_fields(FormatDescriptor::new(format, parser::pdf_parser)),
        FormatType::Word => word_fields(FormatDescriptor::new(format, parser::word_parser)),
        FormatType::Brf
        | FormatType::Braille
        | FormatType::Kurzweil
        | FormatType::Rtf
        | FormatType::Tactile => FormatDescriptor::new(format, parser::empty_parser),
    }
}

fn ocf_fields(descriptor: FormatDescriptor) -> FormatDescriptor {
    descriptor
        .with_field("Title", AccessorSpec::first_of(["title", "doc_title"]))
        .with_field("Author", AccessorSpec::first_of(["author", "doc_author"]))
        .with_field("Editor", "editor")
        .with_field("Creator", "creator")
        .with_field("Contributor", "contributor")
        .with_field("Publisher", "publisher")
        .with_field("PublicationDate", "publication_date")
        .with_field("Date", "date")
        .with_field("Modified", "modified")
        .with_field("Identifiers", AccessorSpec::computed("identifiers", ocf_identifiers))
        .with_field("Language", "language")
        .with_field("Subject", "subject")
        .with_field("Description", "description")
        .with_field("Rights", "rights")
        .with_field("Source", "source")
        .with_field("Type", "type")
        .with_field("Format", "format")
        .with_field("ConformsTo", "conforms_to")
        .with_field("AccessMode", "access_mode")
        .with_field("AccessModeSufficient", "access_mode_sufficient")
        .with_field("AccessibilityFeature", "accessibility_feature")
        .with_field("AccessibilityHazard", "accessibility_hazard")
        .with_field("AccessibilityControl", "accessibility_control")
        .with_field("AccessibilityApi", "accessibility_api")
        .with_field("AccessibilitySummary", "accessibility_summary")
        .with_field("PageCount", AccessorSpec::computed("page_count", ocf_page_count))
        .with_field("CoverImage", "cover_image")
        .with_accessor_transform("identifiers", FieldTransform::Identifier)
        .with_accessor_transform("language", FieldTransform::Language)
        .with_accessor_transform("publication_date", FieldTransform::Date)
}

fn daisy_fields(descriptor: FormatDescriptor) -> FormatDescriptor {
    ocf_fields(descriptor)
        .with_field("Narrator", "narrator")
        .with_field("Producer", "producer")
        .with_field("ProducedDate", "produced_date")
        .with_field("TotalTime", "total_time")
        .with_field("MultimediaType", "multimedia_type")
        .with_field("MultimediaContent", "multimedia_content")
}

fn pdf_fields(descriptor: FormatDescriptor) -> FormatDescriptor {
    descriptor
        .with_field("Title", "title")
        .with_field("Author", "author")
        .with_field("Subject", "subject")
        .with_field("Keywords", "keywords")
        .with_field("Creator", "creator")
        .with_field("Producer", "producer")
        .with_field("Created", "creation_date")
        .with_field("Modified", "mod_date")
        .with_field("Identifiers", AccessorSpec::computed("pdf_identifiers", pdf_identifiers))
        .with_field("PDFVersion", "pdf_version")
        .with_field("PageCount", "page_count")
        .with_field("Tagged", "tagged")
        .with_accessor_transform("keywords", FieldTransform::Split)
        .with_accessor_transform("pdf_identifiers", FieldTransform::Identifier)
}

fn word_fields(descriptor: FormatDescriptor) -> FormatDescriptor {
    descriptor
        .with_field("Title", "title")
        .with_field("Subject", "subject")
        .with_field("Creator", "creator")
        .with_field("Keywords", "keywords")
        .with_field("Description", "description")
        .with_field("Category", "category")
        .with_field("ContentStatus", "content_status")
        .with_field("Language", "language")
        .with_field("Identifiers", "identifier")
        .with_field("LastModifiedBy", "last_modified_by")
        .with_field("Revision", "revision")
        .with_field("Created", "created")
        .with_field("Modified", "modified")
        .with_field("LastPrinted", "last_printed")
        .with_accessor_transform("keywords", FieldTransform::Split)
        .with_accessor_transform("identifier", FieldTransform::Identifier)
        .with_accessor_transform("language", FieldTransform::Language)
}

/// Package identifiers followed by the navigation file's `dtb:uid`.
fn ocf_identifiers(raw: &RawMetadata) -> Vec<String> {
    ["identifier", "uid"]
        .iter()
        .filter_map(|key| raw.get(key))
        .flatten()
        .cloned()
        .collect()
}

/// Declared page count, skipping the `0` NCX files use for "unknown".
fn ocf_page_count(raw: &RawMetadata) -> Vec<String> {
    ["number_of_pages", "total_page_count", "max_page_number"]
        .iter()
        .filter_map(|key| raw.first(key))
        .map(str::trim)
        .find(|count| !count.is_empty() && count.chars().any(|c| c != '0'))
        .map(|count| vec![count.to_string()])
        .unwrap_or_default()
}

/// Identifiers stored under custom info dictionary keys.
fn pdf_identifiers(raw: &RawMetadata) -> Vec<String> {
    const KEYS: [(&str, &str); 6] = [
        ("ISBN", "isbn"),
        ("isbn", "isbn"),
        ("ISSN", "issn"),
        ("issn", "issn"),
        ("DOI", "doi"),
        ("doi", "doi"),
    ];
    KEYS.iter()
        .filter_map(|(key, scheme)| raw.get(key).map(|values| (values, scheme)))
        .flat_map(|(values, scheme)| values.iter().map(move |value| format!("{scheme}:{value}")))
        .collect()
}
