//! Linkcheck: a concurrent broken-link and missing-fragment checker
//!
//! This crate crawls a website from a root URL, follows the links it finds in
//! HTML pages under that root, and reports every link that fails to fetch and
//! every `#fragment` that points at an id the target page does not have.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for linkcheck operations
#[derive(Debug, Error)]
pub enum LinkcheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("All crawl workers exited with {in_flight} fetches still outstanding")]
    WorkersGone { in_flight: usize },

    #[error("A crawl worker failed: {0}")]
    WorkerFailed(#[from] tokio::task::JoinError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("cannot parse {reference:?}: {source}")]
    Parse {
        reference: String,
        source: ::url::ParseError,
    },

    #[error("unsupported URL scheme: {0}")]
    InvalidScheme(String),
}

/// Why a single page could not be fetched
///
/// The `Display` output is what ends up in the report, so a status failure
/// renders exactly like an HTTP status line (`404 Not Found`).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("reading body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("{0}")]
    Url(#[from] UrlError),
}

/// Result type alias for linkcheck operations
pub type Result<T> = std::result::Result<T, LinkcheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CheckConfig;
pub use crawler::{check_site, run_check, CheckOutcome};
pub use output::{exit_code, write_report, Defect, DefectKind};
pub use state::CrawlState;
