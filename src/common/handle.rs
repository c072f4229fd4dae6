//! Byte-addressable sources handed to the extraction pipeline.
//!
//! A [`FileHandle`] is owned by the caller. Parsers only borrow it for the
//! length of one parse call, and every read re-opens the source, so a parser
//! that needs several passes (manifest, navigation file, cover image) never
//! depends on a shared cursor position.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::common::{Error, Result};

/// A readable document source: a local file or an in-memory buffer.
#[derive(Debug, Clone)]
pub enum FileHandle {
    /// A regular file on the local filesystem.
    Path(PathBuf),
    /// Document bytes already held in memory.
    Memory(Bytes),
}

impl FileHandle {
    /// Create a handle for a local file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    /// Create a handle over an in-memory buffer.
    pub fn from_bytes<B: Into<Bytes>>(bytes: B) -> Self {
        Self::Memory(bytes.into())
    }

    /// Buffer a one-shot stream into memory.
    ///
    /// Streams cannot be rewound, and the container parsers need random
    /// access, so the stream is drained once here and never touched again.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::Memory(Bytes::from(data)))
    }

    /// File name of the underlying path, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Path(path) => path.file_name().and_then(|n| n.to_str()),
            Self::Memory(_) => None,
        }
    }

    /// Open a fresh reader positioned at the start of the source.
    ///
    /// A path that names a directory is a caller error and is reported as
    /// [`Error::IncompatibleHandle`]; a missing file is a plain I/O error.
    pub fn open(&self) -> Result<HandleReader> {
        match self {
            Self::Path(path) => {
                ensure_regular_file(path)?;
                let file = File::open(path)?;
                Ok(HandleReader::File(BufReader::new(file)))
            },
            Self::Memory(bytes) => Ok(HandleReader::Memory(Cursor::new(bytes.clone()))),
        }
    }

    /// Read the whole source.
    ///
    /// For in-memory handles this is a reference-counted clone, not a copy.
    pub fn read_all(&self) -> Result<Bytes> {
        match self {
            Self::Path(path) => {
                ensure_regular_file(path)?;
                Ok(Bytes::from(std::fs::read(path)?))
            },
            Self::Memory(bytes) => Ok(bytes.clone()),
        }
    }

    /// Reject sources no parser can read from.
    ///
    /// Only a path naming a directory is incompatible. A missing or
    /// unreadable file is left to the parser, which degrades to empty
    /// metadata.
    pub fn check_compatible(&self) -> Result<()> {
        match self {
            Self::Path(path) if path.is_dir() => Err(Error::IncompatibleHandle(format!(
                "{} is a directory, not a document",
                path.display()
            ))),
            _ => Ok(()),
        }
    }

    /// Read at most `len` bytes from the start of the source.
    pub fn head(&self, len: usize) -> Result<Vec<u8>> {
        match self {
            Self::Memory(bytes) => Ok(bytes[..len.min(bytes.len())].to_vec()),
            Self::Path(_) => {
                let mut reader = self.open()?;
                let mut buf = Vec::with_capacity(len);
                reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
                Ok(buf)
            },
        }
    }
}

impl From<Bytes> for FileHandle {
    fn from(bytes: Bytes) -> Self {
        Self::Memory(bytes)
    }
}

impl From<Vec<u8>> for FileHandle {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Memory(Bytes::from(bytes))
    }
}

impl From<PathBuf> for FileHandle {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for FileHandle {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

fn ensure_regular_file(path: &Path) -> Result<()> {
    if std::fs::metadata(path)?.is_dir() {
        return Err(Error::IncompatibleHandle(format!(
            "{} is a directory, not a document",
            path.display()
        )));
    }
    Ok(())
}

/// Seekable reader over a [`FileHandle`].
#[derive(Debug)]
pub enum HandleReader {
    File(BufReader<File>),
    Memory(Cursor<Bytes>),
}

impl Read for HandleReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::File(reader) => reader.read(buf),
            Self::Memory(cursor) => cursor.read(buf),
        }
    }
}

impl Seek for HandleReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match self {
            Self::File(reader) => reader.seek(pos),
            Self::Memory(cursor) => cursor.seek(pos),
        }
    }
}
