//! Extraction options.

/// Thin space, middle dot, thin space.
pub const DEFAULT_SEPARATOR: &str = "\u{2009}\u{00B7}\u{2009}";

/// Options controlling extraction and normalization.
///
/// # Examples
///
/// ```rust
/// use docmeta::ExtractOptions;
///
/// let options = ExtractOptions::new()
///     .with_separator("; ")
///     .with_cover(false);
/// assert_eq!(options.separator, "; ");
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Joins multiple values of a text field
    pub separator: String,
    /// Fall back to nested `/<path>` matches when a container entry is not
    /// found at its exact path
    pub recursive_lookup: bool,
    /// Embed the cover image of OCF packages as a data URI
    pub include_cover: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            recursive_lookup: true,
            include_cover: true,
        }
    }
}

impl ExtractOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the multi-value separator.
    #[inline]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set whether container lookups may match nested entries.
    #[inline]
    pub fn with_recursive_lookup(mut self, recursive: bool) -> Self {
        self.recursive_lookup = recursive;
        self
    }

    /// Set whether cover images are extracted.
    #[inline]
    pub fn with_cover(mut self, include: bool) -> Self {
        self.include_cover = include;
        self
    }
}
