use crate::{UrlError, UrlResult};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use url::Url;

/// Resolves a possibly-relative href against the page it was found on
///
/// Standard reference resolution applies: a relative reference inherits the
/// scheme, authority, path and query of `base` as needed, an absolute one
/// replaces them. The fragment of `reference` is kept.
///
/// # Arguments
///
/// * `base` - The URL of the page the href appeared on
/// * `reference` - The raw href attribute value
///
/// # Returns
///
/// * `Ok(String)` - The absolute URL, serialized
/// * `Err(UrlError)` - The reference has invalid syntax
///
/// # Examples
///
/// ```
/// use linkcheck::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/index.html").unwrap();
/// assert_eq!(resolve(&base, "intro.html#setup").unwrap(), "https://example.com/docs/intro.html#setup");
/// assert_eq!(resolve(&base, "#top").unwrap(), "https://example.com/docs/index.html#top");
/// ```
pub fn resolve(base: &Url, reference: &str) -> UrlResult<String> {
    base.join(reference)
        .map(String::from)
        .map_err(|source| UrlError::Parse {
            reference: reference.to_string(),
            source,
        })
}

/// Splits a serialized absolute URL into its fragment-less form and fragment
///
/// A serialized URL can only contain `#` as the fragment delimiter, so the
/// split happens at the first one. The fragment is empty when there is none,
/// including for a trailing bare `#`.
///
/// ```
/// use linkcheck::url::split_fragment;
///
/// assert_eq!(split_fragment("https://example.com/a#b"), ("https://example.com/a", "b"));
/// assert_eq!(split_fragment("https://example.com/a"), ("https://example.com/a", ""));
/// ```
pub fn split_fragment(link: &str) -> (&str, &str) {
    link.split_once('#').unwrap_or((link, ""))
}

/// Percent-decodes a fragment so it can be compared with raw id attributes
///
/// Serialized URLs keep fragments encoded (`caf%C3%A9`) while the page
/// source holds the literal id (`café`).
pub fn decode_fragment(fragment: &str) -> Cow<'_, str> {
    percent_decode_str(fragment).decode_utf8_lossy()
}

/// Parses and normalizes the crawl root
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an http or https scheme
/// 3. Empty path becomes /
/// 4. Remove fragment (the root is a frontier URL)
pub fn normalize_root(root: &str) -> UrlResult<Url> {
    let mut url = Url::parse(root).map_err(|source| UrlError::Parse {
        reference: root.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.path().is_empty() {
        url.set_path("/");
    }
    url.set_fragment(None);

    Ok(url)
}

/// Returns true if `url` lies under `root` and should be traversed
///
/// This is a plain prefix test on the serialized forms, so the root's
/// scheme, authority and path prefix must all match.
pub fn is_under_root(url: &str, root: &str) -> bool {
    url.starts_with(root)
}
