//! Post-crawl reconciliation of needed links against crawled pages
//!
//! Runs once, after the scheduler has stopped, and turns the crawl record
//! into a deterministic list of defects.

use crate::crawler::scheduler::CrawlRecord;
use crate::output::{Defect, DefectKind};
use crate::url::{decode_fragment, split_fragment};

/// Computes every defect found by a finished crawl
///
/// # Defect Order
///
/// 1. Failed fetches, sorted by URL
/// 2. Unresolvable hrefs, sorted by referring page (page order within it)
/// 3. Unsatisfied links, sorted by referring page (page order within it)
///
/// A link is unsatisfied if its fragment-less target was never crawled
/// successfully, or if it names a fragment the target has no id for.
pub fn reconcile(record: &CrawlRecord) -> Vec<Defect> {
    let mut failures: Vec<Defect> = record
        .fetch_failures
        .iter()
        .map(|failure| Defect::new(&failure.url, DefectKind::FetchFailed(failure.error.clone())))
        .collect();
    failures.sort_by(|a, b| a.source.cmp(&b.source));

    let mut invalid: Vec<Defect> = record
        .invalid_links
        .iter()
        .map(|(source, link)| {
            Defect::new(
                source,
                DefectKind::InvalidLink {
                    href: link.href.clone(),
                    reason: link.reason.clone(),
                },
            )
        })
        .collect();
    // Stable sort keeps page order for links from the same source
    invalid.sort_by(|a, b| a.source.cmp(&b.source));

    let mut defects = failures;
    defects.append(&mut invalid);

    for (source, destinations) in &record.needs {
        for destination in destinations {
            if let Some(kind) = check_link(record, destination) {
                defects.push(Defect::new(source, kind));
            }
        }
    }

    defects
}

/// Checks one needed link against the crawled pages
fn check_link(record: &CrawlRecord, destination: &str) -> Option<DefectKind> {
    let (target, fragment) = split_fragment(destination);

    let Some(ids) = record.crawled.get(target) else {
        return Some(DefectKind::FailedToFetch(destination.to_string()));
    };

    if fragment.is_empty() || ids.contains(fragment) || ids.contains(decode_fragment(fragment).as_ref())
    {
        None
    } else {
        Some(DefectKind::MissingFragment(destination.to_string()))
    }
}
