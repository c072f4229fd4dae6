//! PDF document information dictionary and catalog flags.
//!
//! The typed tier holds the standard info keys under lower_underscore names
//! plus a few document facts (version, page count, tagged flag). Every
//! string entry of the info dictionary is also kept verbatim in the
//! fallback tier, so custom keys such as `ISBN` stay reachable by name.

use lopdf::{Dictionary, Document, Object};
use tracing::{debug, warn};

use super::MetadataParser;
use crate::common::{FileHandle, Result};
use crate::metadata::RawMetadata;
use crate::normalize::date::clean_pdf_date;

/// Standard info dictionary keys and their raw metadata names.
const INFO_KEYS: &[(&[u8], &str)] = &[
    (b"Title", "title"),
    (b"Author", "author"),
    (b"Subject", "subject"),
    (b"Keywords", "keywords"),
    (b"Creator", "creator"),
    (b"Producer", "producer"),
    (b"CreationDate", "creation_date"),
    (b"ModDate", "mod_date"),
];

/// Parser for PDF files.
#[derive(Debug)]
pub struct PdfParser<'a> {
    handle: &'a FileHandle,
}

impl<'a> PdfParser<'a> {
    pub fn new(handle: &'a FileHandle) -> Self {
        Self { handle }
    }
}

impl MetadataParser for PdfParser<'_> {
    fn parse(&self) -> Result<RawMetadata> {
        self.handle.check_compatible()?;
        let bytes = match self.handle.read_all() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("cannot read PDF source: {e}");
                return Ok(RawMetadata::new());
            },
        };

        match pdf_metadata(&bytes) {
            Ok(raw) => {
                debug!("PDF yielded {} raw fields", raw.len());
                Ok(raw)
            },
            Err(e) => {
                warn!("cannot load PDF document: {e}");
                Ok(RawMetadata::new())
            },
        }
    }
}

fn pdf_metadata(bytes: &[u8]) -> Result<RawMetadata> {
    let doc = Document::load_mem(bytes)?;
    let mut raw = RawMetadata::new();

    if let Some(info) = info_dictionary(&doc) {
        for (key, name) in INFO_KEYS {
            let Some(value) = info.get(key).ok().and_then(|obj| text_value(&doc, obj)) else {
                continue;
            };
            let value = match *name {
                "creation_date" | "mod_date" => clean_pdf_date(&value),
                _ => value,
            };
            if !value.is_empty() {
                raw.insert(name, value);
            }
        }

        for (key, obj) in info.iter() {
            if let Some(value) = text_value(&doc, obj)
                && !value.is_empty()
            {
                raw.insert_fallback(&String::from_utf8_lossy(key), value);
            }
        }
    }

    raw.insert("pdf_version", doc.version.clone());
    raw.insert("page_count", doc.get_pages().len().to_string());
    raw.insert("tagged", is_tagged(&doc).to_string());
    Ok(raw)
}

/// Follow a reference to its target object.
fn resolve<'d>(doc: &'d Document, obj: &'d Object) -> Option<&'d Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    resolve(doc, info)?.as_dict().ok()
}

/// `/MarkInfo << /Marked true >>` in the document catalog.
fn is_tagged(doc: &Document) -> bool {
    let Ok(root) = doc.trailer.get(b"Root") else {
        return false;
    };
    let Some(catalog) = resolve(doc, root).and_then(|obj| obj.as_dict().ok()) else {
        return false;
    };
    catalog
        .get(b"MarkInfo")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
        .and_then(|mark_info| mark_info.get(b"Marked").ok())
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_bool().ok())
        .unwrap_or(false)
}

fn text_value(doc: &Document, obj: &Object) -> Option<String> {
    match resolve(doc, obj)? {
        Object::String(bytes, _) => Some(decode_text(bytes).trim().to_string()),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a byte order mark,
/// otherwise UTF-8, otherwise the single-byte Windows-1252 superset of
/// PDFDocEncoding.
fn decode_text(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let (text, ..) = encoding_rs::UTF_16BE.decode_without_bom_handling(utf16);
        return text.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, ..) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use lopdf::{StringFormat, dictionary};
    use tempfile::TempDir;

    fn build_pdf(info: Option<Dictionary>, marked: bool) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_ids: Vec<Object> = (0..3)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => 3,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if marked {
            catalog.set("MarkInfo", dictionary! { "Marked" => true });
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        if let Some(info) = info {
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    fn utf16(text: &str) -> Object {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(bytes, StringFormat::Hexadecimal)
    }

    fn parse(bytes: Vec<u8>) -> RawMetadata {
        let handle = FileHandle::from(bytes);
        PdfParser::new(&handle).parse().unwrap()
    }

    #[test]
    fn test_info_dictionary() {
        let info = dictionary! {
            "Title" => Object::string_literal("Sample"),
            "Author" => utf16("Zoë Writer"),
            "Keywords" => Object::string_literal("sea, whales"),
            "CreationDate" => Object::string_literal("D:20200305143000+05'30'"),
            "ModDate" => Object::string_literal("D:20210101000000Z00'00'"),
            "Trapped" => "False",
            "ISBN" => Object::string_literal("9780000000002"),
        };
        let raw = parse(build_pdf(Some(info), true));

        assert_eq!(raw.first("title"), Some("Sample"));
        assert_eq!(raw.first("author"), Some("Zoë Writer"));
        assert_eq!(raw.first("keywords"), Some("sea, whales"));
        assert_eq!(raw.first("creation_date"), Some("D:20200305143000+0530"));
        assert_eq!(raw.first("mod_date"), Some("D:20210101000000Z"));
        assert_eq!(raw.first("pdf_version"), Some("1.7"));
        assert_eq!(raw.first("page_count"), Some("3"));
        assert_eq!(raw.first("tagged"), Some("true"));
        assert!(raw.get("subject").is_none());

        // Custom and standard keys reachable verbatim through the fallback tier
        assert_eq!(raw.first("ISBN"), Some("9780000000002"));
        assert_eq!(raw.get_primary("ISBN"), None);
        assert_eq!(raw.first("Title"), Some("Sample"));
        // Name objects are not text strings
        assert!(raw.get("Trapped").is_none());
    }

    #[test]
    fn test_without_info_dictionary() {
        let raw = parse(build_pdf(None, false));
        assert!(raw.get("title").is_none());
        assert_eq!(raw.first("page_count"), Some("3"));
        assert_eq!(raw.first("tagged"), Some("false"));
    }

    #[test]
    fn test_corrupt_pdf_is_empty() {
        let raw = parse(b"%PDF-1.4\nthis is not a real document".to_vec());
        assert!(raw.get("title").is_none());
        assert!(parse(Vec::new()).is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let handle = FileHandle::from_path("/no/such/file.pdf");
        assert!(PdfParser::new(&handle).parse().unwrap().is_empty());
    }

    #[test]
    fn test_directory_is_incompatible() {
        let dir = TempDir::new().unwrap();
        let handle = FileHandle::from_path(dir.path());
        assert!(matches!(
            PdfParser::new(&handle).parse(),
            Err(Error::IncompatibleHandle(_))
        ));
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text(b"plain"), "plain");
        assert_eq!(decode_text(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE9]), "A\u{e9}");
        assert_eq!(decode_text(&[0x43, 0x61, 0x66, 0xE9]), "Caf\u{e9}");
        assert_eq!(decode_text(&[0x93, 0x71, 0x94]), "\u{201c}q\u{201d}");
    }
}
