//! Core format detection functions.
//!
//! Signatures are checked on a short head read first; ZIP packages are then
//! opened to inspect their entries. Detection never fails: anything that
//! cannot be read or recognised is `None`.

use std::path::Path;

use tracing::{debug, warn};

use super::types::FormatType;
use super::utils::{DETECTION_HEAD_LEN, ZIP_SIGNATURE, signature_matches};
use super::{brf, ole2, package, pdf, rtf};
use crate::common::FileHandle;
use crate::container::ZipContainer;

/// Detect the format of the document behind `handle`.
///
/// # Examples
///
/// ```rust
/// use docmeta::common::FileHandle;
/// use docmeta::common::detection::{FormatType, detect_format};
///
/// let handle = FileHandle::from_bytes(&b"%PDF-1.7\n"[..]);
/// assert_eq!(detect_format(&handle), Some(FormatType::Pdf));
/// ```
pub fn detect_format(handle: &FileHandle) -> Option<FormatType> {
    let head = match handle.head(DETECTION_HEAD_LEN) {
        Ok(head) => head,
        Err(e) => {
            warn!("cannot read document for detection: {e}");
            return None;
        },
    };

    let detected = if signature_matches(&head, ZIP_SIGNATURE) {
        ZipContainer::open(handle)
            .and_then(|mut container| package::detect_package_format(&mut container))
    } else {
        detect_signature(&head)
    };
    debug!("content detection: {detected:?}");
    detected
}

/// Detect the format of an in-memory document.
pub fn detect_format_from_bytes(bytes: &[u8]) -> Option<FormatType> {
    if signature_matches(bytes, ZIP_SIGNATURE) {
        return detect_format(&FileHandle::from_bytes(bytes.to_vec()));
    }
    detect_signature(&bytes[..bytes.len().min(DETECTION_HEAD_LEN)])
}

/// Detect the format of a file on disk.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    detect_format(&FileHandle::from_path(path))
}

/// Formats recognisable from leading bytes alone.
fn detect_signature(head: &[u8]) -> Option<FormatType> {
    ole2::detect_ole2_format(head)
        .or_else(|| rtf::detect_rtf_format(head))
        .or_else(|| pdf::detect_pdf_format(head))
        .or_else(|| brf::detect_brf_format(head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::zip_bytes;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_signatures() {
        assert_eq!(detect_format_from_bytes(b"%PDF-1.4\n"), Some(FormatType::Pdf));
        assert_eq!(detect_format_from_bytes(b"{\\rtf1 hi}"), Some(FormatType::Rtf));
        assert_eq!(detect_format_from_bytes(b"HELLO\r\n"), Some(FormatType::Brf));
        assert_eq!(detect_format_from_bytes(b"hello, world"), None);
        assert_eq!(detect_format_from_bytes(b""), None);
    }

    #[test]
    fn test_detect_zip_from_bytes() {
        let epub = zip_bytes(&[("mimetype", "application/epub+zip")]);
        assert_eq!(detect_format_from_bytes(&epub), Some(FormatType::Epub));
    }

    #[test]
    fn test_corrupt_zip_is_unknown() {
        assert_eq!(detect_format_from_bytes(b"PK\x03\x04garbage"), None);
    }

    #[test]
    fn test_detect_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&zip_bytes(&[("book.opf", "<package/>"), ("a/1.mp3", "x")]))
            .unwrap();
        assert_eq!(detect_format_from_path(file.path()), Some(FormatType::DaisyAudio));
        assert_eq!(detect_format_from_path("/no/such/file"), None);
    }
}
