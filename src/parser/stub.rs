//! Parser for formats without extractable metadata.

use super::MetadataParser;
use crate::common::{FileHandle, Result};
use crate::metadata::RawMetadata;

/// Always yields empty metadata.
///
/// Used for BRF, braille, Kurzweil, RTF and tactile files so they still go
/// through the same pipeline as richer formats.
#[derive(Debug)]
pub struct EmptyParser<'a> {
    handle: &'a FileHandle,
}

impl<'a> EmptyParser<'a> {
    pub fn new(handle: &'a FileHandle) -> Self {
        Self { handle }
    }
}

impl MetadataParser for EmptyParser<'_> {
    fn parse(&self) -> Result<RawMetadata> {
        self.handle.check_compatible()?;
        Ok(RawMetadata::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use tempfile::TempDir;

    #[test]
    fn test_empty_parser() {
        let handle = FileHandle::from(b",BRF CONTENT\r\n".to_vec());
        assert!(EmptyParser::new(&handle).parse().unwrap().is_empty());
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let handle = FileHandle::from_path(dir.path());
        assert!(matches!(
            EmptyParser::new(&handle).parse(),
            Err(Error::IncompatibleHandle(_))
        ));
    }
}
