//! Defect types produced by a check run

use std::fmt;

/// What is wrong with a link or page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefectKind {
    /// A frontier URL could not be fetched; carries the status or cause
    FetchFailed(String),

    /// A referenced link's target was never fetched successfully
    FailedToFetch(String),

    /// A referenced fragment has no matching id on the target page
    MissingFragment(String),

    /// An href whose reference syntax could not be resolved
    InvalidLink { href: String, reason: String },
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed(cause) => write!(f, "{}", cause),
            Self::FailedToFetch(link) => write!(f, "failed to fetch: {}", link),
            Self::MissingFragment(link) => write!(f, "missing fragment: {}", link),
            Self::InvalidLink { href, reason } => write!(f, "invalid link {:?}: {}", href, reason),
        }
    }
}

/// One reportable problem, attributed to a URL
///
/// For fetch failures the URL is the page that failed; for link defects it
/// is the page holding the bad link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defect {
    pub source: String,
    pub kind: DefectKind,
}

impl Defect {
    /// Creates a defect against `source`
    pub fn new(source: &str, kind: DefectKind) -> Self {
        Self {
            source: source.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.kind)
    }
}
