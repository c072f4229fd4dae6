//! Fixture builders shared by unit tests.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Build an in-memory ZIP archive from `(path, content)` pairs.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    zip_binary(
        &entries
            .iter()
            .map(|(name, content)| (*name, content.as_bytes()))
            .collect::<Vec<_>>(),
    )
}

/// Same as [`zip_bytes`] for binary payloads.
pub fn zip_binary(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
