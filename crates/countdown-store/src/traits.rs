//! Store trait definitions

use crate::StoreResult;

/// Durable key-value slot storage.
///
/// Writes are synchronous: once `put_slot` returns `Ok`, the value survives
/// a restart.
pub trait Store: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get_slot(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite the value stored under `key`
    fn put_slot(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
