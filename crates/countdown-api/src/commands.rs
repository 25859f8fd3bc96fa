//! Command types read from stdin, one JSON object per line

use countdown_util::TimerId;
use serde::{Deserialize, Serialize};

/// All commands a session accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Create a timer from form values
    Add {
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        hours: i64,
        #[serde(default)]
        minutes: i64,
        #[serde(default)]
        seconds: i64,
    },

    /// Edit a timer. Absent fields keep the timer's current value.
    Edit {
        id: TimerId,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        hours: Option<i64>,
        #[serde(default)]
        minutes: Option<i64>,
        #[serde(default)]
        seconds: Option<i64>,
    },

    Delete { id: TimerId },

    /// Start or pause
    Toggle { id: TimerId },

    Restart { id: TimerId },

    /// Acknowledge an expiry and silence its alert
    Dismiss { id: TimerId },

    /// Emit a snapshot of every timer
    List,

    /// Keepalive
    Ping,
}

impl Command {
    /// Parse one protocol line.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Edit { .. } => "edit",
            Command::Delete { .. } => "delete",
            Command::Toggle { .. } => "toggle",
            Command::Restart { .. } => "restart",
            Command::Dismiss { .. } => "dismiss",
            Command::List => "list",
            Command::Ping => "ping",
        }
    }
}

/// Error codes carried by `error` events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The line was not a valid command
    InvalidCommand,
}

/// Error information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
