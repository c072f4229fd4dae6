//! Braille Ready File heuristic.
//!
//! BRF has no signature. Files are plain ASCII restricted to the 64-cell
//! North American ASCII Braille range (space through underscore) plus line
//! and page breaks, so lower-case letters or any byte outside that range
//! rule the format out.

use super::types::FormatType;

const FORM_FEED: u8 = 0x0C;

#[inline]
fn is_brf_byte(byte: u8) -> bool {
    matches!(byte, 0x20..=0x5F | b'\r' | b'\n' | FORM_FEED)
}

/// Detect BRF content. Empty or whitespace-only input is not BRF.
pub fn detect_brf_format(bytes: &[u8]) -> Option<FormatType> {
    let has_cells = bytes.iter().any(|b| (0x21..=0x5F).contains(b));
    (has_cells && bytes.iter().copied().all(is_brf_byte)).then_some(FormatType::Brf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brf_page() {
        let page = b",! ,QUICK BR[N FOX\r\nJUMPS OV] ! L@Y DOG4\r\n\x0C";
        assert_eq!(detect_brf_format(page), Some(FormatType::Brf));
    }

    #[test]
    fn test_lowercase_text_is_not_brf() {
        assert_eq!(detect_brf_format(b"The quick brown fox"), None);
    }

    #[test]
    fn test_empty_and_blank_are_not_brf() {
        assert_eq!(detect_brf_format(b""), None);
        assert_eq!(detect_brf_format(b"  \r\n"), None);
    }

    #[test]
    fn test_binary_is_not_brf() {
        assert_eq!(detect_brf_format(b"ABC\x00DEF"), None);
    }
}
