use crate::url::LinkFilter;
use serde::Deserialize;
use url::Url;

/// Root crawled when none is given
pub const DEFAULT_ROOT: &str = "http://localhost:8000";

/// Optional settings read from a TOML file
///
/// Every key may be omitted; command-line values take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Root URL to start crawling from
    pub root: Option<String>,

    /// Number of concurrent fetch workers
    pub crawlers: Option<usize>,

    /// URL prefixes that are never fetched or reported
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Replaces the built-in list of inert link schemes
    #[serde(rename = "excluded-schemes")]
    pub excluded_schemes: Option<Vec<String>>,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

/// Validated settings for one check run
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Normalized root URL (never carries a fragment, path at least `/`)
    pub root: Url,

    /// Number of fetch workers, at least 1
    pub crawlers: usize,

    /// Link exclusion rules handed to the fetcher
    pub filter: LinkFilter,

    /// User-Agent header value
    pub user_agent: String,
}

impl CheckConfig {
    /// The root URL in the serialized form used for prefix checks and dedup
    pub fn root_str(&self) -> &str {
        self.root.as_str()
    }
}

/// User-Agent sent when the configuration names none
pub fn default_user_agent() -> String {
    format!("linkcheck/{}", env!("CARGO_PKG_VERSION"))
}

/// Worker count used when none is configured: one per available CPU
pub fn default_crawlers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
