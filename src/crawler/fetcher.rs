//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client
//! - GET requests with status classification
//! - Content sniffing on the first 512 body bytes
//! - Link and id extraction for HTML pages

use crate::crawler::parser::{extract_ids, parse_html, InvalidLink};
use crate::crawler::sniff::{is_html, sniff_content_type, SNIFF_LEN};
use crate::url::LinkFilter;
use crate::FetchError;
use reqwest::{redirect::Policy, Client};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// What a successful fetch learned about a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// Absolute outbound links, fragments intact (empty unless links were requested)
    pub links: Vec<String>,

    /// Hrefs that could not be resolved
    pub invalid_links: Vec<InvalidLink>,

    /// Element ids present on the page (empty for non-HTML resources)
    pub ids: HashSet<String>,
}

impl FetchedPage {
    /// A reachable resource with nothing to parse
    pub fn reached() -> Self {
        Self::default()
    }
}

/// Result of fetching one frontier URL, as reported back by a worker
#[derive(Debug)]
pub struct FetchOutcome {
    /// The URL that was requested
    pub url: String,

    /// The page contents or why it could not be fetched
    pub result: Result<FetchedPage, FetchError>,
}

/// Anything that can fetch a page for the scheduler
///
/// Implementations must not touch crawl state; they only turn a URL into a
/// [`FetchedPage`] or a [`FetchError`].
pub trait PageSource: Send + Sync + 'static {
    /// Fetches `url`; `extract_links` is false for pages outside the root,
    /// which are validated but not traversed. Ids are reported either way.
    fn fetch(
        &self,
        url: &str,
        extract_links: bool,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header value
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use linkcheck::crawler::build_http_client;
///
/// let client = build_http_client("linkcheck/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    filter: LinkFilter,
}

impl HttpFetcher {
    /// Creates a fetcher that drops links rejected by `filter`
    pub fn new(client: Client, filter: LinkFilter) -> Self {
        Self { client, filter }
    }

    /// Fetches a URL and classifies the response
    ///
    /// # Request Flow
    ///
    /// 1. GET the URL (redirects followed, at most 10 hops)
    /// 2. Non-2xx status → `FetchError::Status`
    /// 3. Buffer up to 512 body bytes and sniff the content type
    ///    - Not HTML → reachable, no links, no ids
    /// 4. Read the rest of the body
    /// 5. Extract links (only if requested) and ids
    pub async fn fetch_page(
        &self,
        url: &str,
        extract_links: bool,
    ) -> Result<FetchedPage, FetchError> {
        let base_url = Url::parse(url).map_err(|source| crate::UrlError::Parse {
            reference: url.to_string(),
            source,
        })?;

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned {}", url, status);
            return Err(FetchError::Status(status));
        }

        let mut body = Vec::new();
        while body.len() < SNIFF_LEN {
            match response.chunk().await.map_err(body_error(url))? {
                Some(chunk) => body.extend_from_slice(&chunk),
                None => break,
            }
        }

        if !is_html(&body) {
            tracing::debug!("Skipping {}, content-type {}", url, sniff_content_type(&body));
            return Ok(FetchedPage::reached());
        }

        while let Some(chunk) = response.chunk().await.map_err(body_error(url))? {
            body.extend_from_slice(&chunk);
        }

        tracing::info!("Got OK: {}", url);

        let mut page = FetchedPage {
            ids: extract_ids(&body),
            ..FetchedPage::default()
        };
        for id in &page.ids {
            tracing::trace!(" url {} has #{}", url, id);
        }

        if extract_links {
            let parsed = parse_html(&String::from_utf8_lossy(&body), &base_url, &self.filter);
            page.links = parsed.links;
            page.invalid_links = parsed.invalid_links;
        }

        Ok(page)
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str, extract_links: bool) -> Result<FetchedPage, FetchError> {
        self.fetch_page(url, extract_links).await
    }
}

/// Maps a body read failure, logging it against the page
fn body_error(url: &str) -> impl FnOnce(reqwest::Error) -> FetchError + '_ {
    move |e| {
        tracing::warn!("Error reading {} body: {}", url, e);
        FetchError::Body(e)
    }
}
