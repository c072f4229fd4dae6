//! ZIP entry lookup for OCF and OOXML packages.
//!
//! [`ZipContainer`] parses the central directory once and keeps the entry
//! names in archive order, so callers that read several entries (manifest,
//! navigation file, cover image) pay for the directory scan only once. The
//! free functions are one-shot conveniences over a fresh container.

use std::io::Read;

use ::zip::ZipArchive;
use tracing::{trace, warn};

use crate::common::FileHandle;
use crate::common::handle::HandleReader;

/// Entries larger than this are refused rather than inflated into memory.
pub const MAX_ENTRY_SIZE: u64 = 64 * 1024 * 1024;

/// An opened ZIP package.
pub struct ZipContainer {
    archive: ZipArchive<HandleReader>,
    /// File entry names in central-directory order (directories excluded)
    names: Vec<String>,
}

impl ZipContainer {
    /// Open the archive behind `handle`.
    ///
    /// Returns `None` (after logging a warning) when the source cannot be
    /// read or is not a ZIP archive.
    pub fn open(handle: &FileHandle) -> Option<Self> {
        let reader = match handle.open() {
            Ok(reader) => reader,
            Err(e) => {
                warn!("cannot open container source: {e}");
                return None;
            },
        };

        let mut archive = match ZipArchive::new(reader) {
            Ok(archive) => archive,
            Err(e) => {
                warn!("cannot read ZIP container: {e}");
                return None;
            },
        };

        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            match archive.by_index_raw(i) {
                Ok(entry) if !entry.is_dir() => names.push(entry.name().to_string()),
                Ok(_) => {},
                Err(e) => warn!("skipping unreadable ZIP entry #{i}: {e}"),
            }
        }

        Some(Self { archive, names })
    }

    /// File entry names in archive order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// First entry whose path ends with `ext` (case-sensitive).
    pub fn find_by_extension(&self, ext: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| name.ends_with(ext))
            .map(String::as_str)
    }

    /// Whether any entry path ends with `ext`.
    pub fn has_extension(&self, ext: &str) -> bool {
        self.find_by_extension(ext).is_some()
    }

    /// Number of entries whose path ends with `ext`.
    pub fn count_extension(&self, ext: &str) -> usize {
        self.names.iter().filter(|name| name.ends_with(ext)).count()
    }

    /// Resolve `path` to an entry name.
    ///
    /// An exact match wins. With `recurse`, the first entry ending in
    /// `/<path>` is accepted instead, which copes with packages wrapped in an
    /// extra top-level directory. Several nested matches are not
    /// disambiguated: archive order decides.
    pub fn resolve(&self, path: &str, recurse: bool) -> Option<&str> {
        let path = path.strip_prefix('/').unwrap_or(path);
        if let Some(name) = self.names.iter().find(|name| name.as_str() == path) {
            return Some(name.as_str());
        }
        if !recurse || path.is_empty() {
            return None;
        }
        let suffix = format!("/{path}");
        self.names
            .iter()
            .find(|name| name.ends_with(&suffix))
            .map(String::as_str)
    }

    /// Read the full content of an entry.
    pub fn read(&mut self, path: &str, recurse: bool) -> Option<Vec<u8>> {
        let name = self.resolve(path, recurse)?.to_string();
        trace!("reading ZIP entry {name}");

        let mut entry = match self.archive.by_name(&name) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("cannot open ZIP entry {name}: {e}");
                return None;
            },
        };

        if entry.size() > MAX_ENTRY_SIZE {
            warn!(
                "ZIP entry {name} is {} bytes, over the {MAX_ENTRY_SIZE} byte limit",
                entry.size()
            );
            return None;
        }

        let mut data = Vec::with_capacity(entry.size() as usize);
        if let Err(e) = entry.read_to_end(&mut data) {
            warn!("cannot inflate ZIP entry {name}: {e}");
            return None;
        }
        Some(data)
    }

    /// Read an entry as UTF-8 text (lossy).
    pub fn read_string(&mut self, path: &str, recurse: bool) -> Option<String> {
        self.read(path, recurse)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl std::fmt::Debug for ZipContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipContainer")
            .field("file_count", &self.names.len())
            .finish()
    }
}

/// All file entry names in the container, in archive order.
pub fn entry_names(handle: &FileHandle) -> Vec<String> {
    ZipContainer::open(handle)
        .map(|container| container.names)
        .unwrap_or_default()
}

/// Path of the first entry ending with `ext`, e.g. `.opf` or `.ncx`.
pub fn find_entry_path_by_extension(ext: &str, handle: &FileHandle) -> Option<String> {
    let container = ZipContainer::open(handle)?;
    container.find_by_extension(ext).map(str::to_string)
}

/// Whether the container holds any entry ending with `ext`.
pub fn has_entry_with_extension(ext: &str, handle: &FileHandle) -> bool {
    ZipContainer::open(handle).is_some_and(|container| container.has_extension(ext))
}

/// Read a named entry, optionally falling back to a nested `/<path>` match.
pub fn read_entry(path: &str, handle: &FileHandle, recurse: bool) -> Option<Vec<u8>> {
    ZipContainer::open(handle)?.read(path, recurse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::zip_bytes;

    fn sample() -> FileHandle {
        FileHandle::from(zip_bytes(&[
            ("mimetype", "application/epub+zip"),
            ("META-INF/container.xml", "<container/>"),
            ("book/OEBPS/content.opf", "<package/>"),
            ("book/OEBPS/toc.ncx", "<ncx/>"),
            ("other/content.opf", "<second/>"),
        ]))
    }

    #[test]
    fn test_find_entry_path_by_extension() {
        let handle = sample();
        assert_eq!(
            find_entry_path_by_extension(".opf", &handle),
            Some("book/OEBPS/content.opf".to_string())
        );
        assert_eq!(find_entry_path_by_extension(".mp3", &handle), None);
        // Suffix matching is case-sensitive
        assert_eq!(find_entry_path_by_extension(".OPF", &handle), None);
    }

    #[test]
    fn test_read_entry_exact_and_recursive() {
        let handle = sample();
        assert_eq!(read_entry("mimetype", &handle, false).unwrap(), b"application/epub+zip");
        assert_eq!(read_entry("toc.ncx", &handle, false), None);
        assert_eq!(read_entry("toc.ncx", &handle, true).unwrap(), b"<ncx/>");
        // First nested match wins
        assert_eq!(read_entry("content.opf", &handle, true).unwrap(), b"<package/>");
        assert_eq!(read_entry("/mimetype", &handle, false).unwrap(), b"application/epub+zip");
    }

    #[test]
    fn test_recursive_lookup_respects_path_boundaries() {
        let handle = FileHandle::from(zip_bytes(&[("dir/mycontent.opf", "x")]));
        assert_eq!(read_entry("content.opf", &handle, true), None);
    }

    #[test]
    fn test_corrupt_archive_is_not_found() {
        let handle = FileHandle::from(b"PK\x03\x04 definitely not a zip".to_vec());
        assert_eq!(read_entry("mimetype", &handle, true), None);
        assert_eq!(find_entry_path_by_extension(".opf", &handle), None);
        assert!(!has_entry_with_extension(".mp3", &handle));
        assert!(entry_names(&handle).is_empty());
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let handle = FileHandle::from_path("/no/such/archive.zip");
        assert_eq!(read_entry("content.opf", &handle, true), None);
    }

    #[test]
    fn test_container_counts() {
        let handle = FileHandle::from(zip_bytes(&[
            ("audio/1.mp3", "a"),
            ("audio/2.mp3", "b"),
            ("book.opf", "<package/>"),
        ]));
        let container = ZipContainer::open(&handle).unwrap();
        assert_eq!(container.names().len(), 3);
        assert_eq!(container.count_extension(".mp3"), 2);
        assert!(container.has_extension(".opf"));
    }
}
