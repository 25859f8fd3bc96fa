//! Form validation for new and edited timers

use countdown_api::{MAX_DURATION_SECS, Timer};
use countdown_util::split_hms;
use thiserror::Error;
use tracing::debug;

/// Longest allowed title, in characters after trimming
pub const MAX_TITLE_CHARS: usize = 50;

/// Raw values from an add or edit form.
///
/// Time fields are signed so negative input reaches validation instead of
/// failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerForm {
    pub title: String,
    pub description: String,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimerForm {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        hours: i64,
        minutes: i64,
        seconds: i64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            hours,
            minutes,
            seconds,
        }
    }

    /// Form prefilled from an existing timer, as an edit starts out
    pub fn from_timer(timer: &Timer) -> Self {
        let (h, m, s) = split_hms(timer.duration);
        Self::new(
            timer.title.clone(),
            timer.description.clone(),
            h.into(),
            m.into(),
            s.into(),
        )
    }

    pub fn total_seconds(&self) -> i64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }

    pub fn trimmed_title(&self) -> &str {
        self.title.trim()
    }

    pub fn trimmed_description(&self) -> &str {
        self.description.trim()
    }
}

/// Reasons a form is rejected, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Title must be less than 50 characters")]
    TitleTooLong,

    #[error("Time values cannot be negative")]
    NegativeTime,

    #[error("Minutes and seconds must be between 0 and 59")]
    OutOfRange,

    #[error("Please set a time greater than 0")]
    ZeroDuration,

    #[error("Timer cannot exceed 24 hours")]
    TooLong,
}

/// Check a form, returning the total duration in seconds.
///
/// Stops at the first failing rule.
pub fn check_form(form: &TimerForm) -> Result<u32, FormError> {
    let title = form.trimmed_title();
    if title.is_empty() {
        return Err(FormError::TitleRequired);
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(FormError::TitleTooLong);
    }

    if form.hours < 0 || form.minutes < 0 || form.seconds < 0 {
        return Err(FormError::NegativeTime);
    }
    if form.minutes > 59 || form.seconds > 59 {
        return Err(FormError::OutOfRange);
    }

    let total = form.total_seconds();
    if total == 0 {
        return Err(FormError::ZeroDuration);
    }
    u32::try_from(total)
        .ok()
        .filter(|secs| *secs <= MAX_DURATION_SECS)
        .ok_or(FormError::TooLong)
}

/// Side channel for rejected forms
pub trait ValidationReporter {
    fn report(&mut self, message: &str);
}

/// Keeps every reported message
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    pub messages: Vec<String>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<&str> {
        self.messages.first().map(String::as_str)
    }
}

impl ValidationReporter for CollectingReporter {
    fn report(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Run the checks and report the first failure. Returns the total seconds
/// when the form is valid.
pub fn gate(form: &TimerForm, reporter: &mut dyn ValidationReporter) -> Option<u32> {
    match check_form(form) {
        Ok(total) => Some(total),
        Err(e) => {
            debug!(error = %e, "Form rejected");
            reporter.report(&e.to_string());
            None
        }
    }
}

/// Whether the form may be submitted; failures go to `reporter`.
pub fn validate(form: &TimerForm, reporter: &mut dyn ValidationReporter) -> bool {
    gate(form, reporter).is_some()
}
