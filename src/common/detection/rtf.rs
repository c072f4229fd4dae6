//! RTF (Rich Text Format) detection.
//!
//! RTF files have a simple text-based signature: `{\rtf` optionally followed
//! by a version number.

use super::types::FormatType;
use super::utils::{RTF_SIGNATURE, signature_matches};

/// Detect RTF format from the leading bytes of a file.
///
/// ```rust
/// use docmeta::common::detection::rtf::detect_rtf_format;
///
/// assert!(detect_rtf_format(b"{\\rtf1\\ansi\\deff0 Hello World}").is_some());
/// assert!(detect_rtf_format(b"Plain text file").is_none());
/// ```
#[inline]
pub fn detect_rtf_format(bytes: &[u8]) -> Option<FormatType> {
    signature_matches(bytes, RTF_SIGNATURE).then_some(FormatType::Rtf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_rtf_valid() {
        let rtf_data = b"{\\rtf1\\ansi\\deff0 {\\fonttbl {\\f0 Times New Roman;}} Hello World}";
        assert_eq!(detect_rtf_format(rtf_data), Some(FormatType::Rtf));
        assert_eq!(detect_rtf_format(b"{\\rtf}"), Some(FormatType::Rtf));
    }

    #[test]
    fn test_detect_rtf_invalid() {
        assert_eq!(detect_rtf_format(b"Plain text file"), None);
        assert_eq!(detect_rtf_format(b"{\\rt"), None);
        assert_eq!(detect_rtf_format(b" {\\rtf1}"), None);
    }
}
