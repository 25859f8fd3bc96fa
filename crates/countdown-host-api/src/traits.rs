//! Collaborator traits

use async_trait::async_trait;
use countdown_util::TimerId;
use thiserror::Error;

/// Errors from collaborator operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Notification failed: {0}")]
    NotifyFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// How the user can acknowledge a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissAction {
    pub label: String,
    pub timer_id: TimerId,
}

impl DismissAction {
    pub fn for_timer(timer_id: TimerId) -> Self {
        Self {
            label: "Dismiss".into(),
            timer_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A timer reached zero
    Expiry,
    /// Something went wrong but the session continues
    Warning,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub timer_id: Option<TimerId>,
    pub message: String,
    pub dismiss: Option<DismissAction>,
}

impl Notification {
    /// `Timer "<title>" has ended!` with a dismiss action
    pub fn expired(timer_id: TimerId, title: &str) -> Self {
        Self {
            kind: NotificationKind::Expiry,
            message: expiry_message(title),
            dismiss: Some(DismissAction::for_timer(timer_id.clone())),
            timer_id: Some(timer_id),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            timer_id: None,
            message: message.into(),
            dismiss: None,
        }
    }
}

/// Text shown when a timer ends
pub fn expiry_message(title: &str) -> String {
    format!("Timer \"{}\" has ended!", title)
}

/// Shows messages to the user
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> HostResult<()>;

    /// Withdraw an expiry notification that is still showing
    async fn withdraw(&self, _timer_id: &TimerId) -> HostResult<()> {
        Ok(())
    }
}

/// Plays the audible expiry alert
#[async_trait]
pub trait AlertPlayer: Send + Sync {
    /// Play the alert once, restarting it if it is still sounding
    async fn play_alert(&self) -> HostResult<()>;

    /// Silence the alert if it is sounding
    async fn stop_alert(&self) -> HostResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_notification() {
        let n = Notification::expired(TimerId::new("t-1"), "Tea");
        assert_eq!(n.message, "Timer \"Tea\" has ended!");
        assert_eq!(n.kind, NotificationKind::Expiry);
        assert_eq!(n.timer_id, Some(TimerId::new("t-1")));

        let dismiss = n.dismiss.unwrap();
        assert_eq!(dismiss.label, "Dismiss");
        assert_eq!(dismiss.timer_id.as_str(), "t-1");
    }

    #[test]
    fn warning_has_no_action() {
        let n = Notification::warning("disk full");
        assert_eq!(n.kind, NotificationKind::Warning);
        assert!(n.dismiss.is_none());
        assert!(n.timer_id.is_none());
    }
}
