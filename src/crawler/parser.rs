//! HTML parser for extracting links and element ids
//!
//! This module handles parsing HTML content to extract:
//! - Link targets (from `<a href>` tags), resolved against the page URL
//! - Element ids that fragments may point at

use crate::url::{resolve, LinkFilter};
use lazy_static::lazy_static;
use regex::bytes::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

lazy_static! {
    /// Any `id=` attribute, quoted or not
    static ref ID_ATTRIBUTE: Regex =
        Regex::new(r#"\bid=['"]?([^\s'">]+)"#).expect("valid id attribute pattern");
}

/// An href that could not be resolved to a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLink {
    /// The raw attribute value
    pub href: String,

    /// Why resolution failed
    pub reason: String,
}

/// Links extracted from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Absolute link targets in document order, fragments intact
    pub links: Vec<String>,

    /// Hrefs whose reference syntax is broken
    pub invalid_links: Vec<InvalidLink>,
}

/// Parses HTML content and extracts the links it references
///
/// # Link Extraction Rules
///
/// **Include:**
/// - Every `<a href="...">`, including fragment-only (`#top`) and empty hrefs
///
/// **Exclude:**
/// - Links the [`LinkFilter`] rejects (inert schemes, excluded prefixes)
///
/// Hrefs that fail to resolve are collected in `invalid_links` instead of
/// aborting the page.
///
/// # Example
///
/// ```
/// use linkcheck::crawler::parse_html;
/// use linkcheck::url::LinkFilter;
/// use url::Url;
///
/// let html = r##"<html><body><a href="/page#top">Link</a><a href="mailto:x@y.z">Mail</a></body></html>"##;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url, &LinkFilter::default());
/// assert_eq!(parsed.links, vec!["https://example.com/page#top".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url, filter: &LinkFilter) -> ParsedPage {
    let document = Html::parse_document(html);
    let mut parsed = ParsedPage::default();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            match resolve(base_url, href) {
                Ok(link) => {
                    tracing::debug!("url {} links to {}", base_url, link);
                    if filter.exclude(&link) {
                        tracing::trace!("excluding {}", link);
                        continue;
                    }
                    parsed.links.push(link);
                }
                Err(e) => {
                    tracing::warn!("url {} has unresolvable link {:?}: {}", base_url, href, e);
                    parsed.invalid_links.push(InvalidLink {
                        href: href.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    parsed
}

/// Scans raw page bytes for `id` attribute values
///
/// This is a lexical scan, not a DOM walk: any `id=` token counts, quoted
/// with single or double quotes or unquoted.
pub fn extract_ids(body: &[u8]) -> HashSet<String> {
    ID_ATTRIBUTE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .collect()
}
