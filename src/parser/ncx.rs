//! Navigation control file (NCX) metadata.

use super::ocf::derive_key;
use crate::container::XmlDocument;
use crate::metadata::RawMetadata;

/// Head metadata (`dtb:uid`, `dtb:depth`, `dtb:totalPageCount`,
/// `dtb:maxPageNumber`, …) plus the document title and authors.
pub fn ncx_metadata(ncx: &XmlDocument) -> RawMetadata {
    let mut raw = RawMetadata::new();

    for meta in ncx.find_all("//head/meta") {
        let (Some(name), Some(content)) = (meta.attr("name"), meta.attr("content")) else {
            continue;
        };
        let content = content.trim();
        if !content.is_empty() {
            raw.insert(&derive_key(name), content);
        }
    }

    for (path, key) in [("//docTitle", "doc_title"), ("//docAuthor", "doc_author")] {
        for element in ncx.find_all(path) {
            let text = element.deep_text();
            if !text.is_empty() {
                raw.insert(key, text);
            }
        }
    }

    raw
}
