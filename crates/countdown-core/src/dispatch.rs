//! Hands core events to the notification and alert collaborators

use countdown_host_api::{AlertPlayer, Notification, Notifier};
use std::sync::Arc;
use tracing::warn;

use crate::CoreEvent;

/// Routes expiry-related events to the injected collaborators.
///
/// Collaborator failures are logged and swallowed: a missing sound never
/// stops the timers.
pub struct ExpiryDispatcher {
    notifier: Arc<dyn Notifier>,
    player: Arc<dyn AlertPlayer>,
}

impl ExpiryDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, player: Arc<dyn AlertPlayer>) -> Self {
        Self { notifier, player }
    }

    pub async fn dispatch(&self, event: &CoreEvent) {
        match event {
            CoreEvent::Expired { id, title } => {
                if let Err(e) = self
                    .notifier
                    .notify(Notification::expired(id.clone(), title))
                    .await
                {
                    warn!(timer_id = %id, error = %e, "Failed to show expiry notification");
                }
                self.play(id.as_str()).await;
            }

            CoreEvent::AlertRepeat { id, .. } => {
                self.play(id.as_str()).await;
            }

            CoreEvent::AlertCancelled { id } => {
                if let Err(e) = self.player.stop_alert().await {
                    warn!(timer_id = %id, error = %e, "Failed to stop alert");
                }
                if let Err(e) = self.notifier.withdraw(id).await {
                    warn!(timer_id = %id, error = %e, "Failed to withdraw notification");
                }
            }

            CoreEvent::PersistFailed { operation, error } => {
                let message = format!(
                    "Could not save timers after {}; changes will be lost on exit ({})",
                    operation, error
                );
                if let Err(e) = self.notifier.notify(Notification::warning(message)).await {
                    warn!(error = %e, "Failed to show storage warning");
                }
            }

            _ => {}
        }
    }

    pub async fn dispatch_all(&self, events: &[CoreEvent]) {
        for event in events {
            self.dispatch(event).await;
        }
    }

    async fn play(&self, timer_id: &str) {
        if let Err(e) = self.player.play_alert().await {
            warn!(timer_id, error = %e, "Failed to play alert");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countdown_host_api::{MockAlertPlayer, MockNotifier, NotificationKind};
    use countdown_util::TimerId;

    fn setup() -> (ExpiryDispatcher, MockNotifier, MockAlertPlayer) {
        let notifier = MockNotifier::new();
        let player = MockAlertPlayer::new();
        let dispatcher =
            ExpiryDispatcher::new(Arc::new(notifier.clone()), Arc::new(player.clone()));
        (dispatcher, notifier, player)
    }

    #[tokio::test]
    async fn expiry_notifies_and_plays() {
        let (dispatcher, notifier, player) = setup();

        dispatcher
            .dispatch(&CoreEvent::Expired {
                id: TimerId::new("t-1"),
                title: "Tea".into(),
            })
            .await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "Timer \"Tea\" has ended!");
        assert!(sent[0].dismiss.is_some());
        assert_eq!(player.plays(), 1);
    }

    #[tokio::test]
    async fn repeat_and_cancel() {
        let (dispatcher, notifier, player) = setup();
        let id = TimerId::new("t-1");

        dispatcher
            .dispatch_all(&[
                CoreEvent::AlertRepeat {
                    id: id.clone(),
                    remaining: 1,
                },
                CoreEvent::AlertCancelled { id: id.clone() },
            ])
            .await;

        assert_eq!(player.plays(), 1);
        assert_eq!(player.stops(), 1);
        assert_eq!(notifier.withdrawn(), vec![id]);
    }

    #[tokio::test]
    async fn persist_failure_warns() {
        let (dispatcher, notifier, _player) = setup();

        dispatcher
            .dispatch(&CoreEvent::PersistFailed {
                operation: "add",
                error: "disk full".into(),
            })
            .await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::Warning);
        assert!(sent[0].message.contains("disk full"));
    }

    #[tokio::test]
    async fn collaborator_failures_are_swallowed() {
        let (dispatcher, notifier, player) = setup();
        notifier.set_fail_notify(true);
        player.set_fail_play(true);

        dispatcher
            .dispatch(&CoreEvent::Expired {
                id: TimerId::new("t-1"),
                title: "Tea".into(),
            })
            .await;

        assert!(notifier.sent().is_empty());
        assert_eq!(player.plays(), 0);
    }
}
