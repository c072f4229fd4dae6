//! OLE2 compound document detection (legacy Word `.doc`).
//!
//! Only Word is in scope, so any compound document is taken to be one;
//! the stream directory is not inspected.

use super::types::FormatType;
use super::utils::{OLE2_SIGNATURE, signature_matches};

/// Detect an OLE2 compound document from its signature.
#[inline]
pub fn detect_ole2_format(bytes: &[u8]) -> Option<FormatType> {
    signature_matches(bytes, OLE2_SIGNATURE).then_some(FormatType::Word)
}
