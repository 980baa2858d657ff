//! Linkcheck main entry point
//!
//! This is the command-line interface for the linkcheck crawler.

use anyhow::Context;
use clap::Parser;
use linkcheck::config::{load_config, CliOverrides};
use linkcheck::crawler::run_check;
use linkcheck::output::{EXIT_CANCELLED, EXIT_CONFIG};
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
linkcheck takes a root URL and recurses down through the links it finds
in the HTML pages, checking for broken links (HTTP status other than 2xx)
and for #fragments that point at ids missing from the target page.

Exit status: 0 no problems, 1 problems found, 2 invalid configuration,
3 interrupted (the partial report is still printed; a second interrupt
quits at once without one).";

/// Linkcheck: find broken links and missing fragments on a website
#[derive(Parser, Debug)]
#[command(name = "linkcheck")]
#[command(version)]
#[command(about = "Finds broken links and missing fragments on a website", long_about = USAGE)]
struct Cli {
    /// Root URL to crawl [default: http://localhost:8000]
    #[arg(value_name = "URL")]
    root: Option<String>,

    /// Number of concurrent crawlers [default: number of CPUs]
    #[arg(long, value_name = "N")]
    crawlers: Option<usize>,

    /// Comma separated list of URL prefixes to ignore
    #[arg(long, value_name = "PREFIXES", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Log diagnostics to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Optional TOML settings file; command-line values take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => exit_status(code),
        Err(e) => {
            eprintln!("linkcheck: {:#}", e);
            exit_status(EXIT_CONFIG)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Without `--verbose` nothing but the defect report is printed.
fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("off"),
        1 => EnvFilter::new("linkcheck=debug"),
        _ => EnvFilter::new("linkcheck=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Validates the configuration, wires up Ctrl-C and runs the check
async fn run(cli: Cli) -> anyhow::Result<i32> {
    let overrides = CliOverrides {
        root: cli.root,
        crawlers: cli.crawlers,
        exclude: cli.exclude,
    };
    let config =
        load_config(cli.config.as_deref(), overrides).context("invalid configuration")?;

    tracing::info!(
        "checking {} with {} crawlers, {} excluded prefixes",
        config.root,
        config.crawlers,
        config.filter.prefixes().len()
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if let Some(code) = handle_interrupts(tokio::signal::ctrl_c, on_interrupt).await {
            std::process::exit(code);
        }
    });

    let mut stdout = std::io::stdout().lock();
    let code = run_check(&config, cancel, &mut stdout)
        .await
        .context("crawl failed")?;

    Ok(code)
}

/// Cancels the crawl on the first interrupt and gives up on the second
///
/// Returns the exit code to leave with immediately, or `None` if interrupts
/// cannot be listened for.
async fn handle_interrupts<F, Fut>(mut interrupt: F, cancel: CancellationToken) -> Option<i32>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = interrupt().await {
        tracing::warn!("cannot listen for interrupts: {}", e);
        return None;
    }
    tracing::warn!("interrupt received, finishing in-flight fetches (interrupt again to quit)");
    cancel.cancel();

    if let Err(e) = interrupt().await {
        tracing::warn!("cannot listen for interrupts: {}", e);
        return None;
    }
    tracing::warn!("second interrupt, exiting without a report");
    Some(EXIT_CANCELLED)
}

fn exit_status(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
