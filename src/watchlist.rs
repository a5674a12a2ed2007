//! Durable watchlist of starred coin ids
//!
//! The whole set lives under a single key as a JSON array of ids. Each
//! mutation reads the array, changes it and writes it back while holding the
//! watchlist's lock, so concurrent callers never lose each other's updates.

use crate::{constants::WATCHLIST_KEY, error::StorageError, storage::KeyValueStore};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Set of coin ids persisted in a profile-scoped store
pub struct Watchlist {
    store: Arc<dyn KeyValueStore>,
    lock: Mutex<()>,
}

impl Watchlist {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Ids in insertion order
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let _guard = self.guard()?;
        self.load()
    }

    pub fn contains(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.list()?.iter().any(|existing| existing == id))
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.list()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.list()?.is_empty())
    }

    /// Adds `id`; adding an id already present is a no-op
    pub fn add(&self, id: &str) -> Result<(), StorageError> {
        self.update(|ids| {
            if ids.iter().any(|existing| existing == id) {
                return false;
            }
            ids.push(id.to_string());
            true
        })?;
        Ok(())
    }

    /// Removes `id`; removing an absent id is a no-op
    pub fn remove(&self, id: &str) -> Result<(), StorageError> {
        self.update(|ids| {
            let before = ids.len();
            ids.retain(|existing| existing != id);
            ids.len() != before
        })?;
        Ok(())
    }

    /// Flips membership of `id` and returns whether it is now watched
    pub fn toggle(&self, id: &str) -> Result<bool, StorageError> {
        let mut watched = false;
        self.update(|ids| {
            if let Some(pos) = ids.iter().position(|existing| existing == id) {
                ids.remove(pos);
            } else {
                ids.push(id.to_string());
                watched = true;
            }
            true
        })?;
        Ok(watched)
    }

    /// Empties the watchlist
    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        self.store.remove(WATCHLIST_KEY)?;
        tracing::debug!("Cleared watchlist");
        Ok(())
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.lock.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Stored ids with repeats dropped, first occurrence kept
    fn load(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.store.get(WATCHLIST_KEY)? else {
            return Ok(Vec::new());
        };
        let mut ids: Vec<String> = serde_json::from_str(&raw)?;
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        Ok(ids)
    }

    /// Read-modify-write under the lock; `apply` returns whether it changed
    /// anything, and unchanged sets are not written back.
    fn update(&self, apply: impl FnOnce(&mut Vec<String>) -> bool) -> Result<bool, StorageError> {
        let _guard = self.guard()?;
        let mut ids = self.load()?;
        if !apply(&mut ids) {
            return Ok(false);
        }
        self.store.set(WATCHLIST_KEY, &serde_json::to_string(&ids)?)?;
        tracing::debug!(count = ids.len(), "Updated watchlist");
        Ok(true)
    }
}
