/// Schemes that never point at a fetchable document
pub const INERT_SCHEMES: &[&str] = &["mailto:", "javascript:", "tel:", "sms:", "data:"];

/// Decides which discovered links are left alone entirely
///
/// An excluded link is neither fetched nor reported. Two lists are checked,
/// both as plain prefixes of the absolute link:
/// 1. Inert schemes such as `mailto:` or `javascript:`
/// 2. User supplied URL prefixes (`--exclude`)
#[derive(Debug, Clone)]
pub struct LinkFilter {
    schemes: Vec<String>,
    prefixes: Vec<String>,
}

impl LinkFilter {
    /// Creates a filter with the built-in inert schemes and the given prefixes
    pub fn new(prefixes: Vec<String>) -> Self {
        Self::with_schemes(
            INERT_SCHEMES.iter().map(|s| s.to_string()).collect(),
            prefixes,
        )
    }

    /// Creates a filter with a custom scheme list
    pub fn with_schemes(schemes: Vec<String>, prefixes: Vec<String>) -> Self {
        Self { schemes, prefixes }
    }

    /// Returns true if the link must not be followed or reported
    ///
    /// # Examples
    ///
    /// ```
    /// use linkcheck::url::LinkFilter;
    ///
    /// let filter = LinkFilter::new(vec!["https://example.com/private".to_string()]);
    /// assert!(filter.exclude("mailto:someone@example.com"));
    /// assert!(filter.exclude("https://example.com/private/page"));
    /// assert!(!filter.exclude("https://example.com/public"));
    /// ```
    pub fn exclude(&self, link: &str) -> bool {
        self.schemes
            .iter()
            .chain(self.prefixes.iter())
            .any(|prefix| link.starts_with(prefix.as_str()))
    }

    /// The excluded URL prefixes
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
