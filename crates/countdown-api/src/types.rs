//! Shared types for the countdown API

use countdown_util::{TimerId, format_remaining, remaining_pct};
use serde::{Deserialize, Serialize};

/// Longest allowed timer, in seconds
pub const MAX_DURATION_SECS: u32 = 24 * 60 * 60;

/// A single countdown timer.
///
/// Field names on the wire are fixed: this is the record stored in the
/// durable slot, so renaming any of them breaks existing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: TimerId,
    pub title: String,
    pub description: String,
    /// Configured total, in seconds
    pub duration: u32,
    /// Live countdown value, in seconds
    pub remaining_time: u32,
    pub is_running: bool,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

impl Timer {
    /// A fresh, stopped timer with the full duration remaining.
    pub fn new(
        id: TimerId,
        title: impl Into<String>,
        description: impl Into<String>,
        duration: u32,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            duration,
            remaining_time: duration,
            is_running: false,
            created_at,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0
    }

    /// Whether the duration is in `1..=MAX_DURATION_SECS` and
    /// `remainingTime <= duration`.
    pub fn is_consistent(&self) -> bool {
        (1..=MAX_DURATION_SECS).contains(&self.duration) && self.remaining_time <= self.duration
    }

    pub fn view(&self) -> TimerView {
        TimerView::from(self)
    }
}

/// Partial update applied by an edit. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl TimerUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.duration.is_none()
    }
}

/// A timer plus the values a display needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    pub remaining_display: String,
    pub progress_pct: f64,
}

impl From<&Timer> for TimerView {
    fn from(timer: &Timer) -> Self {
        Self {
            remaining_display: format_remaining(timer.remaining_time),
            progress_pct: remaining_pct(timer.remaining_time, timer.duration),
            timer: timer.clone(),
        }
    }
}
