//! The canonical schema vocabulary shared with the search index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::Error;

/// Shape a canonical value takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single string; several source values are joined.
    Text,
    /// List of strings.
    List,
    /// Single date string; the first source value is kept.
    Date,
    /// Boolean.
    Flag,
}

macro_rules! schema_fields {
    ($( $(#[$doc:meta])* $variant:ident => $name:literal, $kind:ident; )+) => {
        /// A field of the canonical metadata schema.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum SchemaField {
            $( $(#[$doc])* #[serde(rename = $name)] $variant, )+
        }

        impl SchemaField {
            /// Every schema field, in vocabulary order.
            pub const ALL: &'static [SchemaField] = &[$( SchemaField::$variant, )+];

            /// Field name as used by the search index.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( SchemaField::$variant => $name, )+
                }
            }

            /// Value shape of the field.
            pub const fn kind(self) -> FieldKind {
                match self {
                    $( SchemaField::$variant => FieldKind::$kind, )+
                }
            }
        }
    };
}

schema_fields! {
    DcTitle => "dc_title", Text;
    DcCreator => "dc_creator", List;
    DcIdentifier => "dc_identifier", List;
    DcPublisher => "dc_publisher", Text;
    DcLanguage => "dc_language", List;
    DcRights => "dc_rights", Text;
    DcDescription => "dc_description", Text;
    DcSubject => "dc_subject", List;
    /// Format tag of the source file
    DcFormat => "dc_format", Text;
    DcType => "dc_type", Text;
    DctermsDateCopyright => "dcterms_dateCopyright", Date;
    DctermsDateAccepted => "dcterms_dateAccepted", Date;
    EmmaPublicationDate => "emma_publicationDate", Date;
    EmmaLastRemediationDate => "emma_lastRemediationDate", Date;
    EmmaFormatVersion => "emma_formatVersion", Text;
    EmmaFormatFeature => "emma_formatFeature", List;
    SAccessibilityFeature => "s_accessibilityFeature", List;
    SAccessibilityControl => "s_accessibilityControl", List;
    SAccessibilityHazard => "s_accessibilityHazard", List;
    SAccessibilitySummary => "s_accessibilitySummary", Text;
    SAccessMode => "s_accessMode", List;
    SAccessModeSufficient => "s_accessModeSufficient", List;
    BibPageCount => "bib_pageCount", Text;
    /// Whether a PDF carries a structure tree
    PdfTagged => "pdf_tagged", Flag;
}

impl fmt::Display for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::Config(format!("unknown schema field '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for field in SchemaField::ALL {
            assert_eq!(field.as_str().parse::<SchemaField>().unwrap(), *field);
            let json = serde_json::to_string(field).unwrap();
            assert_eq!(json, format!("\"{field}\""));
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(SchemaField::DcTitle.kind(), FieldKind::Text);
        assert_eq!(SchemaField::DcCreator.kind(), FieldKind::List);
        assert_eq!(SchemaField::EmmaPublicationDate.kind(), FieldKind::Date);
        assert_eq!(SchemaField::PdfTagged.kind(), FieldKind::Flag);
    }

    #[test]
    fn test_unknown_field_is_config_error() {
        assert!(matches!("dc_nope".parse::<SchemaField>(), Err(Error::Config(_))));
    }
}
