//! Namespace-tolerant XML trees for package manifests.
//!
//! Manifests in the wild mix prefixed (`dc:title`), default-namespaced and
//! un-namespaced elements, sometimes within one document. Queries here
//! therefore match on local names only: `dc:title`, `*:title` and `title`
//! all select the same elements.
//!
//! Parsing is best-effort. A document that fails to parse is reported with a
//! warning and comes back empty, so callers see "no metadata" rather than an
//! error.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;
use tracing::warn;

/// A parsed XML document. Empty when the input was malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlDocument {
    root: Option<XmlElement>,
}

/// One element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    name: String,
    /// Attributes in document order, namespace declarations excluded
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

/// Parse `bytes` into a tree.
pub fn parse_xml(bytes: &[u8]) -> XmlDocument {
    match build_tree(bytes) {
        Ok(root) => XmlDocument { root },
        Err(message) => {
            warn!("malformed XML document: {message}");
            XmlDocument::default()
        },
    }
}

fn build_tree(bytes: &[u8]) -> std::result::Result<Option<XmlElement>, String> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(XmlElement::from_start(e)),
            Ok(Event::Empty(ref e)) => {
                let element = XmlElement::from_start(e);
                attach(&mut stack, &mut root, element);
            },
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            },
            Ok(Event::Text(ref t)) => {
                if let Some(current) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(t.as_ref());
                    match unescape(&raw) {
                        Ok(text) => current.text.push_str(&text),
                        Err(_) => current.text.push_str(&raw),
                    }
                }
            },
            Ok(Event::GeneralRef(ref r)) => {
                if let Some(current) = stack.last_mut() {
                    let reference = format!("&{};", String::from_utf8_lossy(r.as_ref()));
                    match unescape(&reference) {
                        Ok(text) => current.text.push_str(&text),
                        Err(_) => current.text.push_str(&reference),
                    }
                }
            },
            Ok(Event::CData(ref c)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(c.as_ref()));
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "{e} at byte {}",
                    reader.buffer_position()
                ));
            },
            _ => {},
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(format!("{} unclosed element(s) at end of input", stack.len()));
    }
    Ok(root)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        },
    }
}

/// Split a query path into its steps. A leading `//` selects descendants.
fn split_path(path: &str) -> (bool, SmallVec<[&str; 4]>) {
    let (descendant, rest) = match path.strip_prefix("//") {
        Some(rest) => (true, rest),
        None => (false, path.trim_start_matches('/')),
    };
    let steps = rest.split('/').filter(|step| !step.is_empty()).collect();
    (descendant, steps)
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn step_matches(step: &str, element: &XmlElement) -> bool {
    let wanted = local_part(step);
    wanted == "*" || wanted == element.local_name()
}

impl XmlDocument {
    /// The document element, if the document parsed.
    pub fn root(&self) -> Option<&XmlElement> {
        self.root.as_ref()
    }

    /// Whether parsing produced no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// First element selected by `path`.
    ///
    /// `package/metadata/title` starts at the document element (which must
    /// match the first step); `//metadata/title` starts at any depth.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        self.find_all(path).into_iter().next()
    }

    /// Every element selected by `path`, in document order.
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        let Some(root) = &self.root else {
            return Vec::new();
        };
        let (descendant, steps) = split_path(path);
        let Some((first, rest)) = steps.split_first() else {
            return Vec::new();
        };

        let mut current: Vec<&XmlElement> = if descendant {
            std::iter::once(root)
                .chain(root.descendants())
                .filter(|el| step_matches(first, el))
                .collect()
        } else if step_matches(first, root) {
            vec![root]
        } else {
            Vec::new()
        };

        for step in rest {
            current = select_children(&current, step);
        }
        current
    }
}

fn select_children<'a>(parents: &[&'a XmlElement], step: &str) -> Vec<&'a XmlElement> {
    parents
        .iter()
        .flat_map(|parent| parent.children.iter())
        .filter(|child| step_matches(step, child))
        .collect()
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let raw = String::from_utf8_lossy(&attr.value);
            let value = match unescape(&raw) {
                Ok(value) => value.into_owned(),
                Err(_) => raw.into_owned(),
            };
            attributes.push((key, value));
        }
        Self {
            name,
            attributes,
            ..Self::default()
        }
    }

    /// Qualified name as written, e.g. `dc:title`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Namespace prefix, if the name carries one.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Attribute value by local name (`role` matches `opf:role`).
    pub fn attr(&self, name: &str) -> Option<&str> {
        let wanted = local_part(name);
        self.attributes
            .iter()
            .find(|(key, _)| local_part(key) == wanted)
            .map(|(_, value)| value.as_str())
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Direct text content, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Text of this element and all descendants, trimmed.
    pub fn deep_text(&self) -> String {
        fn collect(element: &XmlElement, out: &mut String) {
            out.push_str(&element.text);
            for child in &element.children {
                collect(child, out);
            }
        }
        let mut out = String::new();
        collect(self, &mut out);
        out.trim().to_string()
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| step_matches(name, child))
    }

    /// First element selected by `path`, relative to this element.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        self.find_all(path).into_iter().next()
    }

    /// Elements selected by `path` relative to this element. With a `//`
    /// prefix the first step may match at any depth below it.
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        let (descendant, steps) = split_path(path);
        let Some((first, rest)) = steps.split_first() else {
            return Vec::new();
        };

        let mut current: Vec<&XmlElement> = if descendant {
            self.descendants().filter(|el| step_matches(first, el)).collect()
        } else {
            select_children(&[self], first)
        };
        for step in rest {
            current = select_children(&current, step);
        }
        current
    }

    /// All elements below this one, depth-first in document order.
    pub fn descendants(&self) -> impl Iterator<Item = &XmlElement> {
        let mut pending: Vec<&XmlElement> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let next = pending.pop()?;
            pending.extend(next.children.iter().rev());
            Some(next)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" xmlns:dc="http://purl.org/dc/elements/1.1/" version="2.0">
  <metadata xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:title>Tom &amp; Jerry</dc:title>
    <dc:creator opf:role="aut">Alice</dc:creator>
    <creator>Bob</creator>
    <meta name="cover" content="cover-img"/>
  </metadata>
  <manifest>
    <item id="cover-img" href="images/cover.jpg" media-type="image/jpeg"/>
  </manifest>
</package>"#;

    #[test]
    fn test_namespace_agnostic_queries() {
        let doc = parse_xml(OPF.as_bytes());
        assert_eq!(doc.root().unwrap().local_name(), "package");

        let titles = doc.find_all("package/metadata/dc:title");
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].text(), "Tom & Jerry");
        assert_eq!(titles[0].prefix(), Some("dc"));

        // Prefixed and unprefixed creators are both reachable
        let creators = doc.find_all("//metadata/*:creator");
        let names: Vec<_> = creators.iter().map(|c| c.text()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(creators[0].attr("role"), Some("aut"));
        assert_eq!(creators[0].attr("opf:role"), Some("aut"));
        assert_eq!(creators[1].attr("role"), None);
    }

    #[test]
    fn test_relative_find_and_attributes() {
        let doc = parse_xml(OPF.as_bytes());
        let manifest = doc.find("//manifest").unwrap();
        let item = manifest.find("item").unwrap();
        assert_eq!(item.attr("href"), Some("images/cover.jpg"));
        assert_eq!(item.attr("media-type"), Some("image/jpeg"));

        // xmlns declarations are not attributes
        let root = doc.root().unwrap();
        assert_eq!(root.attributes().len(), 1);
        assert_eq!(root.attr("version"), Some("2.0"));
    }

    #[test]
    fn test_root_step_must_match() {
        let doc = parse_xml(OPF.as_bytes());
        assert!(doc.find("metadata/title").is_none());
        assert!(doc.find("/package/metadata/title").is_some());
    }

    #[test]
    fn test_character_references_and_cdata() {
        let doc = parse_xml(b"<a>caf&#233; <![CDATA[<raw>]]></a>");
        assert_eq!(doc.root().unwrap().text(), "caf\u{e9} <raw>");
    }

    #[test]
    fn test_deep_text() {
        let doc = parse_xml(b"<docTitle><text>Moby Dick</text></docTitle>");
        let root = doc.root().unwrap();
        assert_eq!(root.text(), "");
        assert_eq!(root.deep_text(), "Moby Dick");
    }

    #[test]
    fn test_malformed_document_is_empty() {
        assert!(parse_xml(b"<a><b></a>").is_empty());
        assert!(parse_xml(b"<a><b>").is_empty());
        assert!(parse_xml(b"").is_empty());
        assert!(parse_xml(b"not xml at all").is_empty());
        assert!(parse_xml(b"<a>").find_all("//a").is_empty());
    }
}
