//! Search debouncing and response ordering.
//!
//! Every keystroke restarts a short debounce window; only when it lapses is a
//! search actually issued. Each issued search gets a fresh generation number,
//! and only responses carrying the latest generation are accepted, so a slow
//! response for an old query can never overwrite results for a newer one.

use tokio::time::{Duration, Instant};

/// Quiet period after the last keystroke before a search is issued.
pub const DEBOUNCE: Duration = Duration::from_millis(120);

/// A search that is due to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSearch {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug)]
struct PendingQuery {
    query: String,
    deadline: Instant,
}

/// Owns the debounce timer and the generation counter.
///
/// The event loop polls [`deadline`](Self::deadline) to arm its timer and
/// calls [`take_due`](Self::take_due) when it fires. Responses are checked
/// against [`accepts`](Self::accepts) before they touch the result list.
#[derive(Debug, Default)]
pub struct SearchCoordinator {
    generation: u64,
    pending: Option<PendingQuery>,
}

impl SearchCoordinator {
    /// Record an input edit. Restarts the debounce window, replacing any
    /// not-yet-issued query.
    pub fn on_query_changed(&mut self, text: &str) {
        self.pending = Some(PendingQuery {
            query: text.to_string(),
            deadline: Instant::now() + DEBOUNCE,
        });
    }

    /// When the next debounced search becomes due, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the pending query once its debounce window has lapsed.
    ///
    /// Surrounding whitespace is trimmed at issue time, so a query of only
    /// spaces degrades to the default (empty-query) search. Bumps the
    /// generation counter, invalidating all in-flight responses.
    pub fn take_due(&mut self) -> Option<IssuedSearch> {
        let pending = self.pending.as_ref()?;
        if Instant::now() < pending.deadline {
            return None;
        }
        let query = self.pending.take().map(|p| p.query)?;
        self.generation += 1;
        Some(IssuedSearch {
            generation: self.generation,
            query: query.trim().to_string(),
        })
    }

    /// Issue an empty-query search immediately, bypassing the debounce.
    ///
    /// Used at startup and when the input is cleared, where waiting out the
    /// debounce would leave stale results on screen.
    pub fn issue_default(&mut self) -> IssuedSearch {
        self.pending = None;
        self.generation += 1;
        IssuedSearch {
            generation: self.generation,
            query: String::new(),
        }
    }

    /// Whether a response tagged with `generation` is still current.
    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation
    }
}
