//! Wishlist and compare list, stored as JSON id arrays in a [`KeyValueStore`].
//!
//! [`ShortlistService`] is the single owner of both lists. Every mutation
//! goes through it and each applied change is published on a broadcast
//! channel, so other parts of the service subscribe instead of polling.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::store::KeyValueStore;

pub const WISHLIST_KEY: &str = "carWishlist";
pub const COMPARE_KEY: &str = "carCompareList";
pub const DEFAULT_COMPARE_LIMIT: usize = 3;

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ListKind {
    Wishlist,
    Compare,
}

impl ListKind {
    pub fn key(self) -> &'static str {
        match self {
            ListKind::Wishlist => WISHLIST_KEY,
            ListKind::Compare => COMPARE_KEY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ToggleOutcome {
    Added,
    Removed,
    // List is full. Not an error: the caller shows the notice.
    Rejected { notice: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistEvent {
    pub list: ListKind,
    pub ids: Vec<i64>,
}

pub struct ShortlistService {
    store: Arc<dyn KeyValueStore>,
    compare_limit: usize,
    // Serializes read-modify-write cycles on the store
    write_lock: Mutex<()>,
    events: broadcast::Sender<ShortlistEvent>,
}

impl ShortlistService {
    pub fn new(store: Arc<dyn KeyValueStore>, compare_limit: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self { store, compare_limit, write_lock: Mutex::new(()), events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShortlistEvent> {
        self.events.subscribe()
    }

    pub fn compare_limit(&self) -> usize {
        self.compare_limit
    }

    /// Reads a list. Missing or corrupt values read as empty.
    pub fn ids(&self, list: ListKind) -> Vec<i64> {
        let Some(raw) = self.store.get(list.key()) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(key = list.key(), error = %e, "Ignoring unparseable stored list");
                Vec::new()
            }
        }
    }

    pub fn contains(&self, list: ListKind, id: i64) -> bool {
        self.ids(list).contains(&id)
    }

    pub fn toggle(&self, list: ListKind, id: i64) -> Result<ToggleOutcome> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids = self.ids(list);

        if let Some(pos) = ids.iter().position(|existing| *existing == id) {
            ids.remove(pos);
            self.save(list, ids)?;
            return Ok(ToggleOutcome::Removed);
        }

        if list == ListKind::Compare && ids.len() >= self.compare_limit {
            tracing::info!(id, limit = self.compare_limit, "Compare list full, rejecting");
            return Ok(ToggleOutcome::Rejected {
                notice: format!(
                    "You can compare up to {} cars at a time. Please remove a car from comparison first.",
                    self.compare_limit
                ),
            });
        }

        ids.push(id);
        self.save(list, ids)?;
        Ok(ToggleOutcome::Added)
    }

    /// Removes `id` if present. Returns whether anything changed.
    pub fn remove(&self, list: ListKind, id: i64) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids = self.ids(list);
        let before = ids.len();
        ids.retain(|existing| *existing != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.save(list, ids)?;
        Ok(true)
    }

    pub fn clear(&self, list: ListKind) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.save(list, Vec::new())
    }

    fn save(&self, list: ListKind, ids: Vec<i64>) -> Result<()> {
        let serialized = serde_json::to_string(&ids).context("Failed to serialize id list")?;
        self.store
            .set(list.key(), serialized)
            .with_context(|| format!("Failed to persist {}", list.key()))?;
        tracing::debug!(key = list.key(), count = ids.len(), "Shortlist updated");
        // No subscribers is fine
        let _ = self.events.send(ShortlistEvent { list, ids });
        Ok(())
    }
}
