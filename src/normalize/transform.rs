//! Value transforms applied to resolved field values.

use super::date::{format_date, format_date_time};
use super::identifier::filter_identifiers;
use super::language::normalize_languages;

/// A transform over the value list of one field.
#[derive(Debug, Clone, Copy)]
pub enum FieldTransform {
    /// Render as `YYYY-MM-DD`.
    Date,
    /// Render as `YYYY-MM-DD HH:MM`, without a midnight time of day.
    DateTime,
    /// Keep recognised publication identifiers as `scheme:value`.
    Identifier,
    /// Normalize to ISO 639-2/B codes.
    Language,
    /// Split delimited values (`a, b; c`) into separate entries.
    Split,
    /// Host-supplied transform.
    Custom(fn(Vec<String>) -> Vec<String>),
}

impl FieldTransform {
    /// Transform implied by a display field's name, if any.
    pub fn for_field(name: &str) -> Option<Self> {
        if name.ends_with("DateTime") || matches!(name, "Modified" | "Created" | "LastPrinted") {
            Some(FieldTransform::DateTime)
        } else if name.ends_with("Date") {
            Some(FieldTransform::Date)
        } else {
            match name {
                "Identifier" | "Identifiers" => Some(FieldTransform::Identifier),
                "Language" | "Languages" => Some(FieldTransform::Language),
                _ => None,
            }
        }
    }

    /// Apply to a value list. Blank results are dropped.
    pub fn apply(self, values: Vec<String>) -> Vec<String> {
        let transformed: Vec<String> = match self {
            FieldTransform::Date => values.iter().map(|v| format_date(v)).collect(),
            FieldTransform::DateTime => values.iter().map(|v| format_date_time(v)).collect(),
            FieldTransform::Identifier => filter_identifiers(&values),
            FieldTransform::Language => normalize_languages(&values),
            FieldTransform::Split => values
                .iter()
                .flat_map(|v| v.split([',', ';']))
                .map(|part| part.trim().to_string())
                .collect(),
            FieldTransform::Custom(func) => func(values),
        };
        transformed
            .into_iter()
            .filter(|value| !value.trim().is_empty())
            .collect()
    }
}
