/// Crawl state definitions for the scheduler
///
/// This module defines the states the control loop moves through during one run.
use std::fmt;

/// Represents the current state of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// URLs are waiting in the frontier and are being handed to workers
    Running,

    /// The frontier is empty but fetches are still in flight
    Draining,

    /// An interrupt arrived; nothing new is dispatched, in-flight work is collected
    Cancelled,

    // ===== Final State =====
    /// The frontier drained naturally
    Done,
}

impl CrawlState {
    /// Returns true if new URLs may still be handed to workers
    pub fn accepts_work(&self) -> bool {
        matches!(self, Self::Running | Self::Draining)
    }

    /// Returns true if the run ended through an interrupt
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Checks whether transitioning from this state to another is valid
    ///
    /// # Valid Transitions
    ///
    /// - Running <-> Draining (the frontier empties and refills)
    /// - Running/Draining -> Done (frontier empty, nothing in flight)
    /// - Running/Draining -> Cancelled (interrupt)
    /// - Any state -> itself
    ///
    /// Cancelled is final for the run; the loop exits from it directly.
    pub fn can_transition_to(&self, target: CrawlState) -> bool {
        if *self == target {
            return true;
        }

        match self {
            Self::Running | Self::Draining => true,
            Self::Cancelled | Self::Done => false,
        }
    }

    /// Returns a lowercase name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Cancelled => "cancelled",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
