//! Crawler module for link checking
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with content sniffing
//! - HTML parsing for links and ids
//! - The scheduler driving a fixed worker pool
//! - Reconciliation of needed links against crawled pages

mod fetcher;
mod parser;
mod reconcile;
mod scheduler;
mod sniff;

pub use fetcher::{build_http_client, FetchOutcome, FetchedPage, HttpFetcher, PageSource};
pub use parser::{extract_ids, parse_html, InvalidLink, ParsedPage};
pub use reconcile::reconcile;
pub use scheduler::{CrawlRecord, FailedFetch, Frontier, Scheduler};
pub use sniff::{is_html, sniff_content_type, SNIFF_LEN};

use crate::config::CheckConfig;
use crate::output::{exit_code, write_report, Defect};
use crate::state::CrawlState;
use crate::Result;
use std::io::Write;
use tokio_util::sync::CancellationToken;

/// Result of one complete check run
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Defects in report order
    pub defects: Vec<Defect>,

    /// How the crawl ended
    pub state: CrawlState,

    /// Number of fetches that completed
    pub pages_fetched: usize,
}

impl CheckOutcome {
    /// Returns true if the run was interrupted
    pub fn cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    /// The process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        exit_code(&self.defects, self.cancelled())
    }
}

/// Crawls the configured site and reconciles the result
///
/// This is the main entry point for a check. It will:
/// 1. Build the HTTP client
/// 2. Crawl everything reachable under the root until drained or cancelled
/// 3. Reconcile the needed links against what was crawled
///
/// # Arguments
///
/// * `config` - Validated check configuration
/// * `cancel` - Fires to stop dispatching new work
///
/// # Returns
///
/// * `Ok(CheckOutcome)` - The crawl finished (possibly cancelled)
/// * `Err(LinkcheckError)` - The HTTP client or worker pool failed
pub async fn check_site(config: &CheckConfig, cancel: CancellationToken) -> Result<CheckOutcome> {
    let client = build_http_client(&config.user_agent)?;
    let fetcher = HttpFetcher::new(client, config.filter.clone());
    let scheduler = Scheduler::new(fetcher, config.root_str(), config.crawlers);

    let record = scheduler.run(cancel).await?;
    let defects = reconcile(&record);
    tracing::info!("{} defects found", defects.len());

    Ok(CheckOutcome {
        defects,
        state: record.state,
        pages_fetched: record.pages_fetched,
    })
}

/// Runs a check, writes the report to `output` and returns the exit code
pub async fn run_check<W: Write>(
    config: &CheckConfig,
    cancel: CancellationToken,
    output: &mut W,
) -> Result<i32> {
    let outcome = check_site(config, cancel).await?;
    write_report(&outcome.defects, output)?;
    Ok(outcome.exit_code())
}
