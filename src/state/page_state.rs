//! Page state definitions for tracking a single page through the pipeline
//!
//! Each seed URL moves through
//! `Pending → Fetching → Fetched → Extracting → Normalizing → Done`,
//! or drops into `Failed` from any non-terminal state.

use std::fmt;

/// Represents the current state of a page in the harvest pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Seed accepted, task not yet started
    Pending,

    /// GET request in flight
    Fetching,

    /// Body received with a success status
    Fetched,

    /// Scanning the body for raw links
    Extracting,

    /// Resolving raw links against the page URL
    Normalizing,

    // ===== Terminal States =====
    /// Link set built and ready for the sink
    Done,

    /// Fetch failed or an unexpected error occurred
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if this is an active state (page may still be processed)
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the transition `self -> next` is allowed
    ///
    /// Any active state may fail; otherwise states advance strictly in order.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        if next == Self::Failed {
            return self.is_active();
        }

        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Fetched)
                | (Self::Fetched, Self::Extracting)
                | (Self::Extracting, Self::Normalizing)
                | (Self::Normalizing, Self::Done)
        )
    }

    /// Short lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Extracting => "extracting",
            Self::Normalizing => "normalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Fetched,
            Self::Extracting,
            Self::Normalizing,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
