//! Session cache for the default market listing
//!
//! Holds one listing payload plus its fetch time in a session-scoped
//! [`KeyValueStore`]. An entry younger than the TTL is served without a
//! request; anything else triggers a fetch that replaces it.

use crate::{
    client::MarketDataClient,
    clock::Clock,
    constants::{CACHED_COINS_KEY, CACHE_TIME_KEY},
    error::{Error, StorageError},
    sequencer::RequestSequencer,
    storage::KeyValueStore,
    types::CoinSummary,
};
use std::sync::{Arc, Mutex};

/// A decoded cache entry
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub payload: Vec<CoinSummary>,
    /// Milliseconds since the Unix epoch
    pub fetched_at: i64,
}

impl CacheEntry {
    /// Milliseconds since the fetch, if representable
    pub fn age_ms(&self, now_ms: i64) -> Option<i64> {
        now_ms.checked_sub(self.fetched_at)
    }

    /// True while `now - fetched_at < ttl_ms`
    ///
    /// A timestamp in the future, or one too far off to subtract, is never
    /// valid.
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        self.age_ms(now_ms)
            .is_some_and(|age| (0..ttl_ms).contains(&age))
    }
}

/// Time-limited cache in front of the default listing query
pub struct ListingCache {
    client: MarketDataClient,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
    per_page: u32,
    sequencer: RequestSequencer,
    write_lock: Mutex<()>,
}

impl ListingCache {
    pub fn new(
        client: MarketDataClient,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ttl_ms: i64,
        per_page: u32,
    ) -> Self {
        Self {
            client,
            store,
            clock,
            ttl_ms,
            per_page,
            sequencer: RequestSequencer::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the listing, from cache when fresh and from the API otherwise
    ///
    /// A failed fetch leaves the cache untouched and propagates the error.
    pub async fn get_listing(&self) -> Result<Vec<CoinSummary>, Error> {
        let now = self.clock.now_ms();
        if let Some(entry) = self.read_entry()? {
            if entry.is_fresh(now, self.ttl_ms) {
                tracing::debug!(
                    count = entry.payload.len(),
                    age_ms = entry.age_ms(now),
                    "Serving listing from session cache"
                );
                return Ok(entry.payload);
            }
        }

        let ticket = self.sequencer.issue();
        let coins = self.client.markets(1, self.per_page).await?;

        if self.sequencer.is_current(ticket) {
            self.write_entry(&coins, self.clock.now_ms())?;
        } else {
            tracing::debug!(
                generation = ticket.generation(),
                "Listing response superseded, not caching"
            );
        }

        Ok(coins)
    }

    /// Reads the current entry, if one is stored and decodable
    ///
    /// Entries that fail to decode read as absent.
    pub fn read_entry(&self) -> Result<Option<CacheEntry>, StorageError> {
        let (Some(payload), Some(time)) = (
            self.store.get(CACHED_COINS_KEY)?,
            self.store.get(CACHE_TIME_KEY)?,
        ) else {
            return Ok(None);
        };

        let fetched_at = match time.trim().parse::<i64>() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable listing cache timestamp");
                return Ok(None);
            }
        };

        match serde_json::from_str::<Vec<CoinSummary>>(&payload) {
            Ok(payload) => Ok(Some(CacheEntry {
                payload,
                fetched_at,
            })),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable listing cache payload");
                Ok(None)
            }
        }
    }

    fn write_entry(&self, coins: &[CoinSummary], fetched_at: i64) -> Result<(), StorageError> {
        let payload = serde_json::to_string(coins)?;
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        self.store.set(CACHED_COINS_KEY, &payload)?;
        self.store.set(CACHE_TIME_KEY, &fetched_at.to_string())?;
        tracing::debug!(count = coins.len(), fetched_at, "Cached market listing");
        Ok(())
    }
}
