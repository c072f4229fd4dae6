//! PDF header detection.
//!
//! The `%PDF-` header is normally at offset zero, but readers tolerate
//! leading garbage (mail headers, BOMs) within the first kilobyte.

use super::types::FormatType;
use super::utils::{PDF_HEADER_WINDOW, PDF_SIGNATURE, find_in_window};

/// Detect a PDF header in the leading bytes of a file.
#[inline]
pub fn detect_pdf_format(bytes: &[u8]) -> Option<FormatType> {
    find_in_window(bytes, PDF_SIGNATURE, PDF_HEADER_WINDOW).map(|_| FormatType::Pdf)
}
