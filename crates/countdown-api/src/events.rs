//! Event types written to stdout, one JSON envelope per line

use chrono::{DateTime, Local};
use countdown_util::TimerId;
use serde::{Deserialize, Serialize};

use crate::{API_VERSION, ErrorInfo, TimerView};

/// Event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub api_version: u32,
    pub timestamp: DateTime<Local>,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(payload: EventPayload) -> Self {
        Self {
            api_version: API_VERSION,
            timestamp: countdown_util::now(),
            payload,
        }
    }

    /// Serialize as a single protocol line (no trailing newline).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Why a timer changed without being added or deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateReason {
    Edited,
    Toggled,
    Restarted,
}

/// All possible events from a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    TimerAdded {
        timer: TimerView,
    },

    TimerUpdated {
        timer: TimerView,
        reason: UpdateReason,
    },

    TimerDeleted {
        id: TimerId,
    },

    /// A timer reached zero
    TimerExpired {
        id: TimerId,
        title: String,
        message: String,
    },

    /// Snapshot of the whole collection, in insertion order
    Timers {
        timers: Vec<TimerView>,
    },

    /// Form values were rejected; nothing changed
    ValidationFailed {
        message: String,
    },

    /// The change was applied but could not be saved
    StorageWarning {
        message: String,
    },

    Error(ErrorInfo),

    Pong,

    /// Session is shutting down
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorCode, Timer};

    #[test]
    fn event_serialization() {
        let timer = Timer::new(TimerId::new("t-1"), "Tea", "", 300, 0);
        let event = Event::new(EventPayload::TimerAdded {
            timer: timer.view(),
        });

        let json = event.to_line().unwrap();
        assert!(!json.contains('\n'));

        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_version, API_VERSION);
        match parsed.payload {
            EventPayload::TimerAdded { timer } => assert_eq!(timer.timer.title, "Tea"),
            other => panic!("Expected TimerAdded, got {:?}", other),
        }
    }

    #[test]
    fn payload_is_tagged_by_type() {
        let event = Event::new(EventPayload::TimerExpired {
            id: TimerId::new("t-1"),
            title: "Tea".into(),
            message: "Timer \"Tea\" has ended!".into(),
        });
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["payload"]["type"], "timer_expired");
        assert_eq!(value["payload"]["id"], "t-1");
    }

    #[test]
    fn error_payload_flattens_info() {
        let event = Event::new(EventPayload::Error(ErrorInfo::new(
            ErrorCode::InvalidCommand,
            "expected value",
        )));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["payload"]["type"], "error");
        assert_eq!(value["payload"]["code"], "invalid_command");
    }
}
