//! Time utilities for countdown
//!
//! Timers count in whole seconds driven by the heartbeat, so wall-clock time
//! is only needed for `createdAt` stamps and event timestamps. Both come from
//! an injectable [`Clock`].
//!
//! # Mock Time for Development
//!
//! In debug builds, the `COUNTDOWN_MOCK_TIME` environment variable can be set
//! to shift the system clock. The mocked clock advances at the real rate.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 14:30:00`)

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "COUNTDOWN_MOCK_TIME";

/// Format accepted by `COUNTDOWN_MOCK_TIME`
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset between mock time and real time, computed once per process.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                return parse_mock_offset(&mock_time_str, chrono::Local::now());
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Compute the offset from `real_now` to the mock time described by `mock_time_str`.
fn parse_mock_offset(mock_time_str: &str, real_now: DateTime<Local>) -> Option<chrono::Duration> {
    let Ok(naive_dt) = NaiveDateTime::parse_from_str(mock_time_str, MOCK_TIME_FORMAT) else {
        tracing::warn!(
            mock_time = %mock_time_str,
            expected_format = MOCK_TIME_FORMAT,
            "Invalid mock time format"
        );
        return None;
    };

    match Local.from_local_datetime(&naive_dt).single() {
        Some(mock_dt) => {
            let offset = mock_dt.signed_duration_since(real_now);
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        None => {
            tracing::warn!(
                mock_time = %mock_time_str,
                "Failed to convert mock time to local timezone"
            );
            None
        }
    }
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

/// Source of the current time in milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Clock backed by [`now`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            ms: AtomicI64::new(start_ms),
        }
    }

    pub fn set(&self, ms: i64) {
        self.ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta: i64) {
        self.ms.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.ms.load(Ordering::SeqCst)
    }
}

/// Format a countdown value for display: `HH:MM:SS`, or `MM:SS` under an hour.
pub fn format_remaining(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Split a duration in seconds into `(hours, minutes, seconds)`.
pub fn split_hms(total_secs: u32) -> (u32, u32, u32) {
    (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60)
}

/// Percentage of the configured duration still remaining, 0.0 for a zero duration.
pub fn remaining_pct(remaining_secs: u32, duration_secs: u32) -> f64 {
    if duration_secs == 0 {
        return 0.0;
    }
    (remaining_secs as f64 / duration_secs as f64 * 100.0).clamp(0.0, 100.0)
}
