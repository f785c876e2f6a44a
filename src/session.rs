//! Search invocation epochs
//!
//! Every search invocation carries a ticket stamped with a monotonically
//! increasing epoch. A new invocation supersedes all earlier ones: late
//! results from a superseded invocation fail the commit check instead of
//! overwriting fresher results, and long local scans can poll their
//! ticket to stop early.

use crate::model::SearchHit;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct SearchTicket {
    epoch: u64,
    current: Arc<AtomicU64>,
}

impl SearchTicket {
    /// True once a newer invocation has begun.
    pub fn is_stale(&self) -> bool {
        self.current.load(Ordering::Acquire) != self.epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Default)]
struct Committed {
    epoch: u64,
    results: Vec<SearchHit>,
}

/// Shared result slot for one search surface (e.g. one screen).
pub struct SearchSession {
    current: Arc<AtomicU64>,
    committed: Mutex<Committed>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            current: Arc::new(AtomicU64::new(0)),
            committed: Mutex::new(Committed::default()),
        }
    }

    /// Start a new invocation, superseding any in flight.
    pub fn begin(&self) -> SearchTicket {
        let epoch = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        SearchTicket {
            epoch,
            current: Arc::clone(&self.current),
        }
    }

    /// Store results if the ticket is still the newest invocation.
    /// Returns whether the commit took effect.
    pub fn commit(&self, ticket: &SearchTicket, results: Vec<SearchHit>) -> bool {
        if ticket.is_stale() {
            tracing::debug!(epoch = ticket.epoch, "discarding results of superseded search");
            return false;
        }
        let mut committed = self.committed.lock().unwrap();
        if committed.epoch > ticket.epoch {
            return false;
        }
        committed.epoch = ticket.epoch;
        committed.results = results;
        true
    }

    /// Snapshot of the most recently committed results.
    pub fn latest(&self) -> Vec<SearchHit> {
        self.committed.lock().unwrap().results.clone()
    }
}
