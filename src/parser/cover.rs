//! Cover image extraction for OCF packages.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

use crate::container::{XmlDocument, XmlElement, ZipContainer};

/// Locate the cover image and return it as a `data:` URI.
///
/// The cover is the manifest item whose id matches the `<meta name="cover">`
/// reference or whose `properties` list contains `cover-image`. Its `href`
/// is resolved against the directory of the package document.
pub fn cover_data_uri(
    container: &mut ZipContainer,
    opf: &XmlDocument,
    opf_path: &str,
    cover_id: Option<&str>,
    recursive: bool,
) -> Option<String> {
    let items = opf.find_all("//manifest/item");
    let item = cover_id
        .and_then(|id| items.iter().find(|item| item.attr("id") == Some(id)))
        .or_else(|| items.iter().find(|item| is_cover_image(item)))?;

    let href = item.attr("href")?;
    let path = resolve_href(opf_path, href);
    let Some(bytes) = container.read(&path, recursive) else {
        warn!("cover image {path} listed in the manifest is missing");
        return None;
    };

    let media_type = item
        .attr("media-type")
        .filter(|media_type| !media_type.is_empty())
        .unwrap_or_else(|| media_type_for(&path));
    debug!("cover image {path} ({media_type}, {} bytes)", bytes.len());
    Some(format!("data:{media_type};base64,{}", STANDARD.encode(bytes)))
}

fn is_cover_image(item: &XmlElement) -> bool {
    item.attr("properties")
        .is_some_and(|properties| properties.split_whitespace().any(|p| p == "cover-image"))
}

/// Resolve a percent-encoded `href` relative to the package document.
fn resolve_href(opf_path: &str, href: &str) -> String {
    let href = href.split(['#', '?']).next().unwrap_or_default();
    let href = urlencoding::decode(href).map_or_else(|_| href.to_string(), |decoded| decoded.into_owned());

    let base = opf_path.rsplit_once('/').map_or("", |(dir, _)| dir);
    let mut segments: Vec<&str> = if href.starts_with('/') {
        Vec::new()
    } else {
        base.split('/').filter(|s| !s.is_empty()).collect()
    };
    for segment in href.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

fn media_type_for(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::FileHandle;
    use crate::container::parse_xml;
    use crate::test_support::zip_bytes;

    #[test]
    fn test_resolve_href() {
        assert_eq!(resolve_href("OEBPS/content.opf", "images/c%20v.jpg"), "OEBPS/images/c v.jpg");
        assert_eq!(resolve_href("OEBPS/content.opf", "../cover.jpg"), "cover.jpg");
        assert_eq!(resolve_href("content.opf", "./img/cover.png#frag"), "img/cover.png");
        assert_eq!(resolve_href("a/b/content.opf", "/root.png"), "root.png");
    }

    #[test]
    fn test_media_type_guess() {
        let opf = parse_xml(
            br#"<package><manifest>
                <item id="x" href="cover.JPG"/>
            </manifest></package>"#,
        );
        let handle = FileHandle::from(zip_bytes(&[("book/cover.JPG", "jpg")]));
        let mut container = ZipContainer::open(&handle).unwrap();
        let uri = cover_data_uri(&mut container, &opf, "book/book.opf", Some("x"), false).unwrap();
        assert_eq!(uri, "data:image/jpeg;base64,anBn");
    }

    #[test]
    fn test_no_cover_declared() {
        let opf = parse_xml(br#"<package><manifest><item id="x" href="a.png"/></manifest></package>"#);
        let handle = FileHandle::from(zip_bytes(&[("a.png", "png")]));
        let mut container = ZipContainer::open(&handle).unwrap();
        assert_eq!(cover_data_uri(&mut container, &opf, "book.opf", None, true), None);
        assert_eq!(cover_data_uri(&mut container, &opf, "book.opf", Some("nope"), true), None);
    }
}
