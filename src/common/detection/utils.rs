//! Signatures and byte helpers for format detection.

use memchr::memmem;

// Magic number signatures
pub const OLE2_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
pub const ZIP_SIGNATURE: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";
pub const RTF_SIGNATURE: &[u8] = b"{\\rtf";

/// How far into the file a PDF header may appear.
pub const PDF_HEADER_WINDOW: usize = 1024;

/// Bytes read from the start of a source for signature checks.
pub const DETECTION_HEAD_LEN: usize = 8 * 1024;

/// Whether `bytes` starts with `signature`.
#[inline]
pub fn signature_matches(bytes: &[u8], signature: &[u8]) -> bool {
    bytes.starts_with(signature)
}

/// Find a pattern in the first `window` bytes of a buffer.
#[inline]
pub fn find_in_window(buffer: &[u8], pattern: &[u8], window: usize) -> Option<usize> {
    memmem::find(&buffer[..window.min(buffer.len())], pattern)
}
