//! Listing search: substring filter plus input debouncing
//!
//! [`Debouncer`] is a plain state machine fed explicit timestamps, so the
//! collapse-to-last-value behaviour can be tested without timers.
//! [`spawn_debounced`] runs it on the tokio runtime for live input.

use crate::types::CoinSummary;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Coins whose name or symbol contains `query`, ignoring case
///
/// An empty (or all-whitespace) query keeps every coin, in listing order.
pub fn filter<'a>(listing: &'a [CoinSummary], query: &str) -> Vec<&'a CoinSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return listing.iter().collect();
    }
    listing
        .iter()
        .filter(|coin| {
            coin.name.to_lowercase().contains(&needle)
                || coin.symbol.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Debouncer state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending { query: String, deadline: Instant },
}

/// Turns raw keystrokes into an effective query after a quiet period
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    state: DebounceState,
    effective: String,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
            effective: String::new(),
        }
    }

    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    /// The last committed query
    pub fn effective(&self) -> &str {
        &self.effective
    }

    /// When the pending value will commit, if one is pending
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            DebounceState::Idle => None,
            DebounceState::Pending { deadline, .. } => Some(*deadline),
        }
    }

    /// Records new raw input, replacing any pending value and restarting the
    /// quiet period
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        self.state = DebounceState::Pending {
            query: value.into(),
            deadline: now + self.delay,
        };
    }

    /// Commits the pending value once its deadline has passed
    ///
    /// Returns the new effective query when it changed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = matches!(
            &self.state,
            DebounceState::Pending { deadline, .. } if now >= *deadline
        );
        if due {
            self.commit()
        } else {
            None
        }
    }

    /// Commits the pending value immediately
    pub fn flush(&mut self) -> Option<String> {
        self.commit()
    }

    fn commit(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, DebounceState::Idle) {
            DebounceState::Pending { query, .. } if query != self.effective => {
                self.effective = query.clone();
                Some(query)
            }
            _ => None,
        }
    }
}

/// Runs a [`Debouncer`] over `input`, publishing effective queries
///
/// The task ends when every input sender is dropped, committing whatever
/// value was still pending.
pub fn spawn_debounced(
    mut input: mpsc::Receiver<String>,
    delay: Duration,
) -> (watch::Receiver<String>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(String::new());

    let handle = tokio::spawn(async move {
        let mut debouncer = Debouncer::new(delay);
        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                received = input.recv() => match received {
                    Some(value) => debouncer.input(value, Instant::now()),
                    None => {
                        if let Some(query) = debouncer.flush() {
                            tx.send_replace(query);
                        }
                        break;
                    }
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(query) = debouncer.poll(Instant::now()) {
                        tracing::debug!(query = %query, "Search query committed");
                        tx.send_replace(query);
                    }
                }
            }
        }
    });

    (rx, handle)
}
