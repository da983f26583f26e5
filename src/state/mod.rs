//! State module for tracking harvest progress
//!
//! - `PageState`: the per-seed pipeline state machine
//! - `PageProgress`: a validated tracker that moves one page through it

mod page_state;

pub use page_state::PageState;

use crate::HarvestError;

/// Tracks the state of one page, rejecting out-of-order transitions
#[derive(Debug, Clone)]
pub struct PageProgress {
    url: String,
    state: PageState,
}

impl PageProgress {
    /// Starts tracking a page in the `Pending` state
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: PageState::Pending,
        }
    }

    /// Current state
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Moves to `next`, or returns `InvalidTransition` without changing state
    pub fn advance(&mut self, next: PageState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                url: self.url.clone(),
                from: self.state,
                to: next,
            });
        }

        tracing::trace!(url = %self.url, from = %self.state, to = %next, "page state change");
        self.state = next;
        Ok(())
    }

    /// Marks the page as failed; a no-op if it is already terminal
    pub fn fail(&mut self) {
        if self.state.is_active() {
            tracing::trace!(url = %self.url, from = %self.state, "page failed");
            self.state = PageState::Failed;
        }
    }
}
