//! Timer identifiers and id generation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Opaque, stable identifier of a timer.
///
/// Serialized as a bare string so the persisted record keeps the plain
/// `"id": "..."` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(String);

impl TimerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TimerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TimerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Source of globally unique timer ids
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> TimerId;
}

/// Random UUID v4 ids, used in production
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> TimerId {
        TimerId(Uuid::new_v4().to_string())
    }
}

/// Deterministic `<prefix>-1`, `<prefix>-2`, ... ids for tests and tooling
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("timer")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> TimerId {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        TimerId(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_id_equality() {
        let id1 = TimerId::new("tea");
        let id2 = TimerId::new("tea");
        let id3 = TimerId::new("eggs");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn uuid_ids_are_unique() {
        let ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::new("t");
        assert_eq!(ids.next_id().as_str(), "t-1");
        assert_eq!(ids.next_id().as_str(), "t-2");
    }

    #[test]
    fn timer_id_serializes_as_plain_string() {
        let id = TimerId::new("abc-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc-123\"");

        let parsed: TimerId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
