//! Generation counter for discarding out-of-date responses
//!
//! Every request for a logical resource takes a [`Ticket`]. Issuing a newer
//! ticket makes all older ones stale, so a slow response that resolves after
//! a faster, newer one can be recognised and dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation number handed out by a [`RequestSequencer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and tells whether a ticket is still the latest one
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every earlier ticket
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no newer ticket has been issued
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Result of a request that may have been overtaken by a newer one
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The request was still the latest when it finished
    Current(T),
    /// A newer request was issued meanwhile; the value was discarded
    Superseded,
}

impl<T> Outcome<T> {
    pub fn into_current(self) -> Option<T> {
        match self {
            Outcome::Current(v) => Some(v),
            Outcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }
}
