//! Normalized output values and the two output maps.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::schema::SchemaField;
use crate::common::{Error, Result};

/// A normalized field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl MetadataValue {
    /// The value as a single string, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetadataValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            MetadataValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(text: &str) -> Self {
        MetadataValue::Text(text.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(text: String) -> Self {
        MetadataValue::Text(text)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(values: Vec<String>) -> Self {
        MetadataValue::List(values)
    }
}

impl From<bool> for MetadataValue {
    fn from(flag: bool) -> Self {
        MetadataValue::Flag(flag)
    }
}

/// Human-labelled metadata for presentation, in field-table order.
///
/// Serializes as a map whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayMetadata {
    entries: Vec<(String, MetadataValue)>,
}

impl DisplayMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, label: String, value: MetadataValue) {
        self.entries.push((label, value));
    }

    /// Value for a display label such as `Title` or `Identifiers`.
    pub fn get(&self, label: &str) -> Option<&MetadataValue> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| value)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DisplayMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Metadata keyed by the shared schema vocabulary, ready for indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalMetadata {
    fields: BTreeMap<SchemaField, MetadataValue>,
}

impl CanonicalMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: SchemaField) -> Option<&MetadataValue> {
        self.fields.get(&field)
    }

    pub(crate) fn entry(
        &mut self,
        field: SchemaField,
    ) -> std::collections::btree_map::Entry<'_, SchemaField, MetadataValue> {
        self.fields.entry(field)
    }

    pub fn contains(&self, field: SchemaField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SchemaField, &MetadataValue)> {
        self.fields.iter().map(|(field, value)| (*field, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render as a YAML mapping, e.g. for search-record front matter.
    ///
    /// Returns an empty string when no field is present.
    pub fn to_yaml(&self) -> Result<String> {
        if self.is_empty() {
            return Ok(String::new());
        }
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize metadata to YAML: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_serializes_in_order() {
        let mut display = DisplayMetadata::new();
        display.push("Title".into(), "Sample".into());
        display.push("Creators".into(), vec!["A".to_string(), "B".to_string()].into());
        display.push("Tagged".into(), true.into());

        let json = serde_json::to_string(&display).unwrap();
        assert_eq!(json, r#"{"Title":"Sample","Creators":["A","B"],"Tagged":true}"#);
        assert_eq!(display.labels().collect::<Vec<_>>(), vec!["Title", "Creators", "Tagged"]);
    }

    #[test]
    fn test_canonical_serializes_schema_names() {
        let mut canonical = CanonicalMetadata::new();
        canonical
            .entry(SchemaField::DcTitle)
            .or_insert_with(|| "Sample".into());
        canonical
            .entry(SchemaField::PdfTagged)
            .or_insert(MetadataValue::Flag(false));

        let json = serde_json::to_value(&canonical).unwrap();
        assert_eq!(json["dc_title"], "Sample");
        assert_eq!(json["pdf_tagged"], false);

        let back: CanonicalMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, canonical);
    }

    #[test]
    fn test_yaml_rendering() {
        assert_eq!(CanonicalMetadata::new().to_yaml().unwrap(), "");

        let mut canonical = CanonicalMetadata::new();
        canonical
            .entry(SchemaField::DcLanguage)
            .or_insert_with(|| vec!["eng".to_string()].into());
        let yaml = canonical.to_yaml().unwrap();
        assert!(yaml.contains("dc_language"));
        assert!(yaml.contains("eng"));
    }
}
