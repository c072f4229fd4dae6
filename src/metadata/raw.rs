//! Parser output before normalization.

use std::fmt;

/// Raw key/value metadata produced by one parse call.
///
/// Every key maps to an ordered list of strings, even for fields that are
/// scalar in the source document, so the normalization engine sees a single
/// shape. A secondary fallback tier holds source-native keys (the PDF info
/// dictionary verbatim, for instance) that [`RawMetadata::get`] consults
/// only when the primary tier has no entry.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawMetadata {
    fields: Vec<(String, Vec<String>)>,
    fallback: Vec<(String, Vec<String>)>,
}

fn entry<'a>(tier: &'a mut Vec<(String, Vec<String>)>, key: &str) -> &'a mut Vec<String> {
    let index = match tier.iter().position(|(k, _)| k == key) {
        Some(index) => index,
        None => {
            tier.push((key.to_string(), Vec::new()));
            tier.len() - 1
        },
    };
    &mut tier[index].1
}

fn lookup<'a>(tier: &'a [(String, Vec<String>)], key: &str) -> Option<&'a [String]> {
    tier.iter()
        .find(|(k, _)| k == key)
        .map(|(_, values)| values.as_slice())
}

impl RawMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value under `key`.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        entry(&mut self.fields, key).push(value.into());
    }

    /// Append several values under `key`.
    pub fn extend<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        entry(&mut self.fields, key).extend(values.into_iter().map(Into::into));
    }

    /// Append one value to the fallback tier.
    pub fn insert_fallback(&mut self, key: &str, value: impl Into<String>) {
        entry(&mut self.fallback, key).push(value.into());
    }

    /// Values for `key`, falling back to the secondary tier.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        lookup(&self.fields, key).or_else(|| lookup(&self.fallback, key))
    }

    /// First value for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    /// Values from the primary tier only.
    pub fn get_primary(&self, key: &str) -> Option<&[String]> {
        lookup(&self.fields, key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Primary entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Fallback entries in insertion order.
    pub fn fallback_iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fallback.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of primary keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.fallback.is_empty()
    }

    /// Right-biased deep merge: values of `other` are appended after ours,
    /// keys new to `self` are added at the end.
    pub fn merge(&mut self, other: RawMetadata) {
        for (key, values) in other.fields {
            entry(&mut self.fields, &key).extend(values);
        }
        for (key, values) in other.fallback {
            entry(&mut self.fallback, &key).extend(values);
        }
    }

    /// Owned variant of [`RawMetadata::merge`].
    pub fn merged(mut self, other: RawMetadata) -> Self {
        self.merge(other);
        self
    }
}

impl fmt::Debug for RawMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, values) in self.iter() {
            map.entry(&key, &values);
        }
        for (key, values) in self.fallback_iter() {
            map.entry(&format_args!("~{key}"), &values);
        }
        map.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawMetadata {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut raw = RawMetadata::new();
        for (key, value) in iter {
            let key: String = key.into();
            raw.insert(&key, value);
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_always_lists() {
        let mut raw = RawMetadata::new();
        raw.insert("title", "Sample");
        raw.insert("creator", "A");
        raw.insert("creator", "B");
        assert_eq!(raw.get("title").unwrap(), ["Sample"]);
        assert_eq!(raw.get("creator").unwrap(), ["A", "B"]);
        assert_eq!(raw.first("creator"), Some("A"));
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_fallback_tier() {
        let mut raw = RawMetadata::new();
        raw.insert("title", "Typed");
        raw.insert_fallback("title", "Native");
        raw.insert_fallback("ISBN", "9780000000002");

        assert_eq!(raw.first("title"), Some("Typed"));
        assert_eq!(raw.first("ISBN"), Some("9780000000002"));
        assert!(raw.get_primary("ISBN").is_none());
        assert!(!raw.is_empty());
    }

    #[test]
    fn test_merge_appends() {
        let mut opf: RawMetadata = [("title", "Book"), ("uid", "a")].into_iter().collect();
        let ncx: RawMetadata = [("uid", "b"), ("depth", "2")].into_iter().collect();
        opf.merge(ncx);

        assert_eq!(opf.get("uid").unwrap(), ["a", "b"]);
        let keys: Vec<_> = opf.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "uid", "depth"]);
    }

    #[test]
    fn test_empty() {
        assert!(RawMetadata::new().is_empty());
        assert!(RawMetadata::new().merged(RawMetadata::new()).is_empty());
    }
}
