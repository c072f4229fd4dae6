//! Document format tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::Error;

/// Formats the extraction pipeline knows about.
///
/// The serialized tag is the camel-case name (`daisyAudio`); parsing also
/// accepts snake case (`daisy_audio`) and ignores ASCII case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatType {
    /// EPUB 2/3 publication (.epub)
    Epub,
    /// DAISY text-only book packaged as ZIP
    Daisy,
    /// DAISY book carrying audio files
    DaisyAudio,
    /// Portable Document Format (.pdf)
    Pdf,
    /// Microsoft Word (.docx, .doc)
    Word,
    /// Braille Ready File (.brf)
    Brf,
    /// Other embosser-ready braille (.brl)
    Braille,
    /// Kurzweil 3000 document (.kes)
    Kurzweil,
    /// Rich Text Format (.rtf)
    Rtf,
    /// Tactile graphics package
    Tactile,
}

impl FormatType {
    /// Every format, in built-in registration order.
    pub const ALL: [FormatType; 10] = [
        FormatType::Epub,
        FormatType::Daisy,
        FormatType::DaisyAudio,
        FormatType::Pdf,
        FormatType::Word,
        FormatType::Brf,
        FormatType::Braille,
        FormatType::Kurzweil,
        FormatType::Rtf,
        FormatType::Tactile,
    ];

    /// Canonical tag, as used in configuration and serialized output.
    pub const fn as_str(self) -> &'static str {
        match self {
            FormatType::Epub => "epub",
            FormatType::Daisy => "daisy",
            FormatType::DaisyAudio => "daisyAudio",
            FormatType::Pdf => "pdf",
            FormatType::Word => "word",
            FormatType::Brf => "brf",
            FormatType::Braille => "braille",
            FormatType::Kurzweil => "kurzweil",
            FormatType::Rtf => "rtf",
            FormatType::Tactile => "tactile",
        }
    }

    /// Whether the format is packaged as an OCF (ZIP + OPF) container.
    pub const fn is_ocf(self) -> bool {
        matches!(self, FormatType::Epub | FormatType::Daisy | FormatType::DaisyAudio)
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        FormatType::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(&folded))
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!("daisyAudio".parse::<FormatType>().unwrap(), FormatType::DaisyAudio);
        assert_eq!("daisy_audio".parse::<FormatType>().unwrap(), FormatType::DaisyAudio);
        assert_eq!("EPUB".parse::<FormatType>().unwrap(), FormatType::Epub);
        assert!(matches!(
            "mobi".parse::<FormatType>(),
            Err(Error::UnknownFormat(tag)) if tag == "mobi"
        ));
    }

    #[test]
    fn test_display_matches_serde_tag() {
        for format in FormatType::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{format}\""));
            assert_eq!(format.to_string().parse::<FormatType>().unwrap(), format);
        }
    }
}
