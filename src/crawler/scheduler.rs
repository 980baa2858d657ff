//! Scheduler driving the crawl frontier through a fixed worker pool
//!
//! This module handles:
//! - The frontier queue and its dedupe set
//! - A fixed pool of fetch workers, each handed a URL only when idle
//! - Folding fetch results back into the crawl record
//! - Termination (frontier empty, nothing in flight) and cancellation
//!
//! All crawl state is owned by the single control loop in [`Scheduler::run`].
//! Workers only ever see a URL going in and a [`FetchOutcome`] coming out.

use crate::crawler::fetcher::{FetchOutcome, FetchedPage, PageSource};
use crate::crawler::parser::InvalidLink;
use crate::state::CrawlState;
use crate::url::{is_under_root, split_fragment};
use crate::{LinkcheckError, Result};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// An idle worker's request for its next URL
type Ticket = oneshot::Sender<String>;

/// URLs waiting to be fetched, each admitted at most once per run
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` unless it was ever queued before
    ///
    /// Returns true if the URL was newly admitted.
    pub fn push(&mut self, url: &str) -> bool {
        if self.queued.contains(url) {
            return false;
        }
        self.queued.insert(url.to_string());
        self.queue.push_back(url.to_string());
        true
    }

    /// Removes and returns the next URL
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Number of URLs still waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs ever admitted
    pub fn seen(&self) -> usize {
        self.queued.len()
    }
}

/// A frontier URL whose fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFetch {
    pub url: String,
    pub error: String,
}

/// Everything a crawl learned, handed to the reconciler once the loop ends
#[derive(Debug, Clone)]
pub struct CrawlRecord {
    /// Fragment-less URL -> ids on that page, for every successful fetch
    pub crawled: HashMap<String, HashSet<String>>,

    /// Under-root page -> links it referenced, in document order
    pub needs: BTreeMap<String, Vec<String>>,

    /// Fetches that failed, in arrival order
    pub fetch_failures: Vec<FailedFetch>,

    /// Unresolvable hrefs, keyed by the page they appeared on
    pub invalid_links: Vec<(String, InvalidLink)>,

    /// Number of fetch outcomes folded in
    pub pages_fetched: usize,

    /// State the control loop finished in (`Done` or `Cancelled`)
    pub state: CrawlState,
}

impl CrawlRecord {
    fn new() -> Self {
        Self {
            crawled: HashMap::new(),
            needs: BTreeMap::new(),
            fetch_failures: Vec::new(),
            invalid_links: Vec::new(),
            pages_fetched: 0,
            state: CrawlState::Running,
        }
    }

    /// Returns true if the run was interrupted
    pub fn cancelled(&self) -> bool {
        self.state.is_cancelled()
    }
}

/// Crawl scheduler owning the frontier and the worker pool
///
/// The scheduler coordinates:
/// - A fixed number of workers (the only bound on concurrent requests)
/// - Dedupe of fragment-stripped link targets
/// - Traversal limited to URLs under the root
pub struct Scheduler<S: PageSource> {
    source: Arc<S>,
    root: String,
    crawlers: usize,
}

impl<S: PageSource> Scheduler<S> {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `source` - The page fetcher shared by all workers
    /// * `root` - Serialized root URL; also the traversal prefix
    /// * `crawlers` - Number of workers (values below 1 are raised to 1)
    pub fn new(source: S, root: impl Into<String>, crawlers: usize) -> Self {
        Self {
            source: Arc::new(source),
            root: root.into(),
            crawlers: crawlers.max(1),
        }
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// A URL is only handed over once an idle worker has asked for one. Once
    /// `cancel` fires no further URL is dispatched, but every fetch already
    /// taken by a worker is awaited and folded into the record.
    pub async fn run(self, cancel: CancellationToken) -> Result<CrawlRecord> {
        tracing::info!("starting {} crawlers", self.crawlers);

        // Each idle worker parks exactly one ticket here, so N slots never fill
        let (ready_tx, mut ready_rx) = mpsc::channel::<Ticket>(self.crawlers);
        let (result_tx, mut result_rx) = mpsc::channel::<FetchOutcome>(self.crawlers);

        let root: Arc<str> = Arc::from(self.root.as_str());
        let mut workers = JoinSet::new();
        for id in 0..self.crawlers {
            workers.spawn(worker(
                id,
                Arc::clone(&self.source),
                Arc::clone(&root),
                ready_tx.clone(),
                result_tx.clone(),
            ));
        }
        // Only workers hold senders, so a closed channel means they are gone
        drop(ready_tx);
        drop(result_tx);

        let mut frontier = Frontier::new();
        frontier.push(&self.root);

        let mut record = CrawlRecord::new();
        let mut state = CrawlState::Running;
        let mut in_flight = 0usize;

        while (state.accepts_work() && !frontier.is_empty()) || in_flight > 0 {
            let dispatch = state.accepts_work() && !frontier.is_empty();

            tokio::select! {
                biased;

                _ = cancel.cancelled(), if state.accepts_work() => {
                    tracing::info!(
                        "interrupted: waiting for {} in-flight fetches, {} URLs left unvisited",
                        in_flight,
                        frontier.len()
                    );
                    state = transition(state, CrawlState::Cancelled)?;
                }

                Some(joined) = workers.join_next() => {
                    // Workers only return on their own once the run is over
                    joined?;
                    tracing::warn!("crawl worker exited early, {} left", workers.len());
                }

                outcome = result_rx.recv() => {
                    let Some(outcome) = outcome else {
                        return Err(LinkcheckError::WorkersGone { in_flight });
                    };
                    in_flight -= 1;
                    self.fold(outcome, &mut frontier, &mut record);
                }

                ticket = ready_rx.recv(), if dispatch => {
                    let Some(ticket) = ticket else {
                        return Err(LinkcheckError::WorkersGone { in_flight });
                    };
                    if let Some(url) = frontier.pop() {
                        tracing::trace!("dispatching {}", url);
                        ticket
                            .send(url)
                            .map_err(|_| LinkcheckError::WorkersGone { in_flight })?;
                        in_flight += 1;
                    }
                }
            }

            if state.accepts_work() {
                let next = if frontier.is_empty() {
                    CrawlState::Draining
                } else {
                    CrawlState::Running
                };
                state = transition(state, next)?;
            }
        }

        if state.accepts_work() {
            state = transition(state, CrawlState::Done)?;
        }
        record.state = state;

        // Dropping the parked tickets lets idle workers exit
        drop(ready_rx);
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("crawl worker ended abnormally: {}", e);
            }
        }

        tracing::info!(
            "crawl {}: {} pages fetched, {} URLs discovered, {} fetch failures",
            record.state,
            record.pages_fetched,
            frontier.seen(),
            record.fetch_failures.len()
        );

        Ok(record)
    }

    /// Folds one worker report into the crawl record and grows the frontier
    fn fold(&self, outcome: FetchOutcome, frontier: &mut Frontier, record: &mut CrawlRecord) {
        record.pages_fetched += 1;
        let FetchOutcome { url, result } = outcome;

        let page: FetchedPage = match result {
            Ok(page) => page,
            Err(error) => {
                tracing::debug!("fetch failed for {}: {}", url, error);
                record.fetch_failures.push(FailedFetch {
                    url,
                    error: error.to_string(),
                });
                return;
            }
        };

        record.crawled.insert(url.clone(), page.ids);

        // Pages outside the root are leaves: reachable, never traversed
        if !is_under_root(&url, &self.root) {
            return;
        }

        for link in &page.links {
            let (target, _) = split_fragment(link);
            if frontier.push(target) {
                tracing::trace!("queued {}", target);
            }
        }
        record.invalid_links.extend(
            page.invalid_links
                .into_iter()
                .map(|invalid| (url.clone(), invalid)),
        );
        record.needs.insert(url, page.links);
    }
}

fn transition(from: CrawlState, to: CrawlState) -> Result<CrawlState> {
    if !from.can_transition_to(to) {
        return Err(LinkcheckError::InvalidTransition { from, to });
    }
    if from != to {
        tracing::trace!("crawl state {} -> {}", from, to);
    }
    Ok(to)
}

/// One fetch worker: offer a ticket, fetch what arrives on it, report back
async fn worker<S: PageSource>(
    id: usize,
    source: Arc<S>,
    root: Arc<str>,
    ready: mpsc::Sender<Ticket>,
    results: mpsc::Sender<FetchOutcome>,
) {
    loop {
        let (ticket, assignment) = oneshot::channel();
        if ready.send(ticket).await.is_err() {
            break;
        }
        let Ok(url) = assignment.await else {
            break;
        };

        let extract_links = is_under_root(&url, &root);
        let result = source.fetch(&url, extract_links).await;

        if results.send(FetchOutcome { url, result }).await.is_err() {
            break;
        }
    }
    tracing::trace!("crawler {} exiting", id);
}
