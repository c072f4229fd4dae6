//! Accessor specifications and their resolution against raw metadata.

use crate::metadata::RawMetadata;

/// Signature of a computed accessor.
pub type ComputeFn = fn(&RawMetadata) -> Vec<String>;

/// How one display field pulls its value out of [`RawMetadata`].
#[derive(Debug, Clone)]
pub enum AccessorSpec {
    /// Direct key lookup.
    Key(String),
    /// Candidates tried in order; the first with a non-blank value wins.
    Priority(Vec<AccessorSpec>),
    /// A function of the whole raw record.
    Computed { name: &'static str, func: ComputeFn },
}

impl AccessorSpec {
    pub fn key(key: impl Into<String>) -> Self {
        AccessorSpec::Key(key.into())
    }

    /// Priority list of direct keys.
    pub fn first_of<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccessorSpec::Priority(keys.into_iter().map(|k| AccessorSpec::Key(k.into())).collect())
    }

    pub fn computed(name: &'static str, func: ComputeFn) -> Self {
        AccessorSpec::Computed { name, func }
    }
}

impl From<&str> for AccessorSpec {
    fn from(key: &str) -> Self {
        AccessorSpec::key(key)
    }
}

/// Result of resolving an accessor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolved<'a> {
    /// Non-blank values, trimmed, in source order. Always a list, even for
    /// scalar fields.
    pub values: Vec<String>,
    /// Name of the accessor that produced the values: the key, the winning
    /// candidate of a priority list, or the computed accessor's name.
    pub accessor: Option<&'a str>,
}

impl Resolved<'_> {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn non_blank<'v>(values: impl IntoIterator<Item = &'v String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve `spec` against `raw`.
pub fn resolve<'a>(spec: &'a AccessorSpec, raw: &RawMetadata) -> Resolved<'a> {
    match spec {
        AccessorSpec::Key(key) => Resolved {
            values: raw.get(key).map(|values| non_blank(values)).unwrap_or_default(),
            accessor: Some(key.as_str()),
        },
        AccessorSpec::Priority(candidates) => candidates
            .iter()
            .map(|candidate| resolve(candidate, raw))
            .find(|resolved| !resolved.is_empty())
            .unwrap_or_default(),
        AccessorSpec::Computed { name, func } => Resolved {
            values: non_blank(&func(raw)),
            accessor: Some(*name),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page_count(raw: &RawMetadata) -> Vec<String> {
        raw.get("page").map(|pages| vec![pages.len().to_string()]).unwrap_or_default()
    }

    #[test]
    fn test_priority_first_non_blank_wins() {
        let mut raw = RawMetadata::new();
        raw.insert("a", "   ");
        raw.insert("b", "from b");
        let spec = AccessorSpec::first_of(["a", "b"]);

        let resolved = resolve(&spec, &raw);
        assert_eq!(resolved.values, vec!["from b"]);
        assert_eq!(resolved.accessor, Some("b"));
    }

    #[test]
    fn test_priority_with_absent_first_candidate() {
        let raw: RawMetadata = [("b", "x")].into_iter().collect();
        let spec = AccessorSpec::Priority(vec!["a".into(), "b".into()]);
        assert_eq!(resolve(&spec, &raw).values, vec!["x"]);
    }

    #[test]
    fn test_nothing_resolves() {
        let spec = AccessorSpec::first_of(["a", "b"]);
        let resolved = resolve(&spec, &RawMetadata::new());
        assert!(resolved.is_empty());
        assert_eq!(resolved.accessor, None);
    }

    #[test]
    fn test_computed_accessor() {
        let raw: RawMetadata = [("page", "1"), ("page", "2")].into_iter().collect();
        let spec = AccessorSpec::computed("page_count", page_count);
        let resolved = resolve(&spec, &raw);
        assert_eq!(resolved.values, vec!["2"]);
        assert_eq!(resolved.accessor, Some("page_count"));
    }

    #[test]
    fn test_fallback_tier_is_reachable() {
        let mut raw = RawMetadata::new();
        raw.insert_fallback("ISBN", "9780000000002");
        assert_eq!(resolve(&"ISBN".into(), &raw).values, vec!["9780000000002"]);
    }

    proptest! {
        #[test]
        fn resolved_values_are_a_non_blank_list(values in proptest::collection::vec("[ a-z]{0,6}", 0..6)) {
            let mut raw = RawMetadata::new();
            raw.extend("field", values.clone());
            let spec = AccessorSpec::key("field");
            let resolved = resolve(&spec, &raw);

            let expected: Vec<String> = values
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect();
            prop_assert_eq!(&resolved.values, &expected);
            prop_assert!(resolved.values.iter().all(|v| !v.trim().is_empty()));
        }
    }
}
