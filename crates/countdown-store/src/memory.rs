//! In-memory store with failure injection, for tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{Store, StoreError, StoreResult};

/// Store backed by a `HashMap`.
///
/// Clones share the same slots and flags, so a test can keep a handle while
/// the code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
    fail_reads: Arc<Mutex<bool>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail
    pub fn set_fail_reads(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_reads.lock() {
            *flag = fail;
        }
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }

    /// Raw access for seeding a slot, bypassing failure injection
    pub fn seed(&self, key: &str, value: &str) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
    }

    /// Raw value of a slot, bypassing failure injection
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    fn flag(flag: &Mutex<bool>) -> bool {
        flag.lock().map(|f| *f).unwrap_or(true)
    }
}

impl Store for MemoryStore {
    fn get_slot(&self, key: &str) -> StoreResult<Option<String>> {
        if Self::flag(&self.fail_reads) {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        let slots = self
            .slots
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(slots.get(key).cloned())
    }

    fn put_slot(&self, key: &str, value: &str) -> StoreResult<()> {
        if Self::flag(&self.fail_writes) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        !Self::flag(&self.fail_reads) && !Self::flag(&self.fail_writes)
    }
}
