//! Field normalization engine.
//!
//! Turns a parser's [`RawMetadata`] into the two outputs consumers see:
//!
//! - [`format_metadata`] walks the descriptor's field table in order and
//!   produces labelled values for presentation. Field-keyed transforms
//!   (dates, identifiers, languages) and accessor-keyed transforms both
//!   apply.
//! - [`mapped_metadata`] walks the field map and produces values keyed by
//!   the canonical schema. Only accessor-keyed transforms apply; the value
//!   shape follows the schema field's kind.

pub mod accessor;
pub mod date;
pub mod identifier;
pub mod label;
pub mod language;
pub mod transform;

use std::collections::btree_map::Entry;

use tracing::trace;

pub use accessor::{AccessorSpec, ComputeFn, Resolved, resolve};
pub use identifier::{Identifier, IdentifierScheme, filter_identifiers};
pub use label::{display_label, pluralize, titleize};
pub use language::normalize_language;
pub use transform::FieldTransform;

use crate::ExtractOptions;
use crate::metadata::{
    CanonicalMetadata, DisplayMetadata, FieldKind, MetadataValue, RawMetadata,
};
use crate::registry::FormatDescriptor;

/// Display fields that always render as a list, even with one value.
pub const ALWAYS_ARRAY: &[&str] = &[
    "Creator",
    "Subject",
    "AccessibilityFeature",
    "AccessibilityHazard",
    "AccessibilityControl",
    "AccessMode",
    "AccessModeSufficient",
    "AccessibilityApi",
];

fn apply_accessor_transform(
    descriptor: &FormatDescriptor,
    resolved: &Resolved<'_>,
    values: Vec<String>,
) -> Vec<String> {
    match resolved
        .accessor
        .and_then(|name| descriptor.transform_for_accessor(name))
    {
        Some(transform) => transform.apply(values),
        None => values,
    }
}

/// Labelled metadata for display, in field-table order.
pub fn format_metadata(
    raw: &RawMetadata,
    descriptor: &FormatDescriptor,
    options: &ExtractOptions,
) -> DisplayMetadata {
    let mut display = DisplayMetadata::new();

    for (field, spec) in &descriptor.field_table {
        let resolved = resolve(spec, raw);
        if resolved.is_empty() {
            continue;
        }

        let mut values = resolved.values.clone();
        if let Some(transform) = FieldTransform::for_field(field) {
            values = transform.apply(values);
        }
        values = apply_accessor_transform(descriptor, &resolved, values);
        if values.is_empty() {
            trace!("display field {field} emptied by its transforms");
            continue;
        }

        let label = display_label(field, values.len());
        let value = if ALWAYS_ARRAY.contains(&field.as_str()) {
            MetadataValue::List(values)
        } else {
            MetadataValue::Text(values.join(&options.separator))
        };
        display.push(label, value);
    }

    display
}

/// Metadata keyed by canonical schema field.
///
/// When several format fields map to one schema field, list values are
/// appended in field-map order and scalar values keep the first.
pub fn mapped_metadata(
    raw: &RawMetadata,
    descriptor: &FormatDescriptor,
    options: &ExtractOptions,
) -> CanonicalMetadata {
    let mut canonical = CanonicalMetadata::new();

    for (field, schema_field) in &descriptor.field_map {
        let Some(spec) = descriptor.accessor_for(field) else {
            continue;
        };
        let resolved = resolve(spec, raw);
        if resolved.is_empty() {
            continue;
        }
        let values = apply_accessor_transform(descriptor, &resolved, resolved.values.clone());
        let Some(first) = values.first().cloned() else {
            continue;
        };

        let value = match schema_field.kind() {
            FieldKind::List => MetadataValue::List(values),
            FieldKind::Text => MetadataValue::Text(values.join(&options.separator)),
            FieldKind::Date => MetadataValue::Text(first),
            FieldKind::Flag => MetadataValue::Flag(parse_flag(&first)),
        };

        match canonical.entry(*schema_field) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            },
            Entry::Occupied(mut slot) => {
                if let (MetadataValue::List(existing), MetadataValue::List(more)) =
                    (slot.get_mut(), value)
                {
                    existing.extend(more);
                }
            },
        }
    }

    canonical
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::FormatType;
    use crate::metadata::SchemaField;
    use crate::parser::empty_parser;

    fn descriptor() -> FormatDescriptor {
        FormatDescriptor::new(FormatType::Epub, empty_parser)
            .with_mime_types(["application/epub+zip"])
            .with_file_extensions(["epub"])
            .with_field("Title", AccessorSpec::first_of(["title", "doc_title"]))
            .with_field("Author", "author")
            .with_field("Editor", "editor")
            .with_field("Creator", "creator")
            .with_field("Subject", "subject")
            .with_field("Keywords", "keywords")
            .with_field("PublicationDate", "publication_date")
            .with_field("Identifiers", "identifier")
            .with_field("Tagged", "tagged")
            .with_field("PageCount", "page_count")
            .map_field("Title", SchemaField::DcTitle)
            .map_field("Author", SchemaField::DcCreator)
            .map_field("Editor", SchemaField::DcCreator)
            .map_field("PublicationDate", SchemaField::EmmaPublicationDate)
            .map_field("Identifiers", SchemaField::DcIdentifier)
            .map_field("Tagged", SchemaField::PdfTagged)
            .map_field("Keywords", SchemaField::DcDescription)
            .with_accessor_transform("identifier", FieldTransform::Identifier)
    }

    fn raw(pairs: &[(&str, &str)]) -> RawMetadata {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_priority_accessor_in_display() {
        let raw = raw(&[("title", ""), ("doc_title", "From NCX")]);
        let display = format_metadata(&raw, &descriptor(), &ExtractOptions::default());
        assert_eq!(display.get("Title"), Some(&MetadataValue::from("From NCX")));
    }

    #[test]
    fn test_display_only_field() {
        let raw = raw(&[("title", "Sample"), ("page_count", "12")]);
        let descriptor = descriptor();
        let options = ExtractOptions::default();

        let display = format_metadata(&raw, &descriptor, &options);
        let canonical = mapped_metadata(&raw, &descriptor, &options);

        assert_eq!(display.get("Page Count"), Some(&MetadataValue::from("12")));
        assert_eq!(canonical.len(), 1);
        assert!(canonical.iter().all(|(_, v)| v.as_text() != Some("12")));
    }

    #[test]
    fn test_separator_and_plural_label() {
        let keywords = raw(&[("keywords", "A"), ("keywords", "B")]);
        let display = format_metadata(&keywords, &descriptor(), &ExtractOptions::default());
        assert_eq!(
            display.get("Keywords"),
            Some(&MetadataValue::from("A\u{2009}\u{00B7}\u{2009}B"))
        );

        let authors = raw(&[("author", "A"), ("author", "B")]);
        let options = ExtractOptions::new().with_separator(", ");
        let display = format_metadata(&authors, &descriptor(), &options);
        assert_eq!(display.get("Authors"), Some(&MetadataValue::from("A, B")));
        assert!(display.get("Author").is_none());
    }

    #[test]
    fn test_always_array_fields() {
        let raw = raw(&[("creator", "Solo"), ("subject", "Fiction"), ("subject", "Sea")]);
        let display = format_metadata(&raw, &descriptor(), &ExtractOptions::default());
        assert_eq!(
            display.get("Creator"),
            Some(&MetadataValue::List(vec!["Solo".to_string()]))
        );
        assert_eq!(
            display.get("Subjects"),
            Some(&MetadataValue::List(vec!["Fiction".to_string(), "Sea".to_string()]))
        );
    }

    #[test]
    fn test_field_transforms_are_display_only() {
        let raw = raw(&[("publication_date", "2020-03-05T00:00:00Z")]);
        let descriptor = descriptor();
        let options = ExtractOptions::default();

        let display = format_metadata(&raw, &descriptor, &options);
        assert_eq!(display.get("Publication Date"), Some(&MetadataValue::from("2020-03-05")));

        let canonical = mapped_metadata(&raw, &descriptor, &options);
        assert_eq!(
            canonical.get(SchemaField::EmmaPublicationDate),
            Some(&MetadataValue::from("2020-03-05T00:00:00Z"))
        );
    }

    #[test]
    fn test_accessor_transform_applies_to_both_outputs() {
        let raw = raw(&[("identifier", "isbn:9780000000002"), ("identifier", "calibre:7")]);
        let descriptor = descriptor();
        let options = ExtractOptions::default();

        let display = format_metadata(&raw, &descriptor, &options);
        assert_eq!(display.get("Identifiers"), Some(&MetadataValue::from("isbn:9780000000002")));

        let canonical = mapped_metadata(&raw, &descriptor, &options);
        assert_eq!(
            canonical.get(SchemaField::DcIdentifier),
            Some(&MetadataValue::List(vec!["isbn:9780000000002".to_string()]))
        );
    }

    #[test]
    fn test_identifier_field_dropped_when_nothing_valid() {
        let raw = raw(&[("identifier", "urn:uuid:1234")]);
        let display = format_metadata(&raw, &descriptor(), &ExtractOptions::default());
        assert!(display.get("Identifiers").is_none());
        assert!(display.get("Identifier").is_none());
    }

    #[test]
    fn test_shared_schema_field_appends_lists() {
        let raw = raw(&[("author", "A. Writer"), ("editor", "J. Smith")]);
        let canonical = mapped_metadata(&raw, &descriptor(), &ExtractOptions::default());
        assert_eq!(
            canonical.get(SchemaField::DcCreator),
            Some(&MetadataValue::List(vec!["A. Writer".to_string(), "J. Smith".to_string()]))
        );
    }

    #[test]
    fn test_canonical_shapes() {
        let raw = raw(&[("title", "Sample"), ("tagged", "Yes"), ("keywords", "a"), ("keywords", "b")]);
        let options = ExtractOptions::new().with_separator(" | ");
        let canonical = mapped_metadata(&raw, &descriptor(), &options);
        assert_eq!(canonical.get(SchemaField::DcTitle), Some(&MetadataValue::from("Sample")));
        assert_eq!(canonical.get(SchemaField::PdfTagged), Some(&MetadataValue::Flag(true)));
        assert_eq!(canonical.get(SchemaField::DcDescription), Some(&MetadataValue::from("a | b")));
    }

    #[test]
    fn test_empty_raw_gives_empty_outputs() {
        let options = ExtractOptions::default();
        assert!(format_metadata(&RawMetadata::new(), &descriptor(), &options).is_empty());
        assert!(mapped_metadata(&RawMetadata::new(), &descriptor(), &options).is_empty());
    }
}
