//! The timer slot: the whole collection as one JSON array

use countdown_api::Timer;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::{Store, StoreError, StoreResult};

/// A named slot holding the serialized timer collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSlot {
    key: String,
}

impl TimerSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrite the slot with the whole collection.
    pub fn save(&self, store: &dyn Store, timers: &[Timer]) -> StoreResult<()> {
        let json = serde_json::to_string(timers)?;
        store.put_slot(&self.key, &json)?;
        debug!(key = %self.key, count = timers.len(), "Timers saved");
        Ok(())
    }

    /// Read the slot, distinguishing absence from failure.
    ///
    /// A record with a duplicate id, a duration outside `1..=86400`, or
    /// `remainingTime > duration` makes the whole slot corrupt.
    pub fn try_load(&self, store: &dyn Store) -> StoreResult<Option<Vec<Timer>>> {
        let Some(json) = store.get_slot(&self.key)? else {
            return Ok(None);
        };

        let timers: Vec<Timer> = serde_json::from_str(&json)?;

        if let Some(bad) = timers.iter().find(|t| !t.is_consistent()) {
            return Err(StoreError::Corrupt {
                key: self.key.clone(),
                reason: format!(
                    "timer {} has duration {} and remainingTime {}",
                    bad.id, bad.duration, bad.remaining_time
                ),
            });
        }

        let mut seen = HashSet::new();
        if let Some(dup) = timers.iter().find(|t| !seen.insert(&t.id)) {
            return Err(StoreError::Corrupt {
                key: self.key.clone(),
                reason: format!("duplicate timer id {}", dup.id),
            });
        }

        Ok(Some(timers))
    }

    /// Read the slot, yielding an empty collection on absence or any failure.
    pub fn load(&self, store: &dyn Store) -> Vec<Timer> {
        match self.try_load(store) {
            Ok(Some(timers)) => {
                debug!(key = %self.key, count = timers.len(), "Timers loaded");
                timers
            }
            Ok(None) => {
                debug!(key = %self.key, "No saved timers");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable timer slot");
                Vec::new()
            }
        }
    }
}
