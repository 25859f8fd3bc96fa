//! Terminal notifier

use async_trait::async_trait;
use countdown_host_api::{HostError, HostResult, Notification, NotificationKind, Notifier};
use countdown_util::TimerId;
use std::io::Write;
use std::sync::Mutex;
use tracing::debug;

/// Writes notifications as single lines to a terminal stream (stderr by
/// default, since stdout carries the event protocol).
pub struct TerminalNotifier {
    out: Mutex<Box<dyn Write + Send>>,
    expiry_enabled: bool,
}

impl TerminalNotifier {
    /// Notifier on stderr. With `expiry_enabled` false only warnings are shown.
    pub fn stderr(expiry_enabled: bool) -> Self {
        Self::with_writer(Box::new(std::io::stderr()), expiry_enabled)
    }

    pub fn with_writer(out: Box<dyn Write + Send>, expiry_enabled: bool) -> Self {
        Self {
            out: Mutex::new(out),
            expiry_enabled,
        }
    }

    fn write_line(&self, line: &str) -> HostResult<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| HostError::Internal("notifier lock poisoned".into()))?;
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

/// Render a notification as one terminal line
pub fn render_notification(notification: &Notification) -> String {
    let prefix = match notification.kind {
        NotificationKind::Expiry => "⏰",
        NotificationKind::Warning => "⚠",
    };

    match &notification.dismiss {
        Some(action) => format!(
            "{} {}  [{}: {{\"type\":\"dismiss\",\"id\":\"{}\"}}]",
            prefix, notification.message, action.label, action.timer_id
        ),
        None => format!("{} {}", prefix, notification.message),
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn notify(&self, notification: Notification) -> HostResult<()> {
        if notification.kind == NotificationKind::Expiry && !self.expiry_enabled {
            debug!(message = %notification.message, "Expiry notification suppressed");
            return Ok(());
        }
        self.write_line(&render_notification(&notification))
    }

    async fn withdraw(&self, timer_id: &TimerId) -> HostResult<()> {
        debug!(timer_id = %timer_id, "Notification dismissed");
        Ok(())
    }
}
