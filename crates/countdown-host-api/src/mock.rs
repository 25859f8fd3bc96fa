//! Mock collaborators for testing

use async_trait::async_trait;
use countdown_util::TimerId;
use std::sync::{Arc, Mutex};

use crate::{AlertPlayer, HostError, HostResult, Notification, Notifier};

/// Mock notifier that records everything it is asked to show
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    withdrawn: Arc<Mutex<Vec<TimerId>>>,

    /// Configure notify to fail
    pub fail_notify: Arc<Mutex<bool>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, in order
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Timers whose notification was withdrawn, in order
    pub fn withdrawn(&self) -> Vec<TimerId> {
        self.withdrawn.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn set_fail_notify(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_notify.lock() {
            *flag = fail;
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, notification: Notification) -> HostResult<()> {
        if self.fail_notify.lock().map(|f| *f).unwrap_or(false) {
            return Err(HostError::NotifyFailed("Mock notify failure".into()));
        }
        self.sent
            .lock()
            .map_err(|_| HostError::Internal("lock poisoned".into()))?
            .push(notification);
        Ok(())
    }

    async fn withdraw(&self, timer_id: &TimerId) -> HostResult<()> {
        self.withdrawn
            .lock()
            .map_err(|_| HostError::Internal("lock poisoned".into()))?
            .push(timer_id.clone());
        Ok(())
    }
}

/// Mock alert player that counts plays and stops
#[derive(Debug, Clone, Default)]
pub struct MockAlertPlayer {
    plays: Arc<Mutex<u32>>,
    stops: Arc<Mutex<u32>>,
    sounding: Arc<Mutex<bool>>,

    /// Configure play to fail
    pub fail_play: Arc<Mutex<bool>>,
}

impl MockAlertPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> u32 {
        self.plays.lock().map(|p| *p).unwrap_or(0)
    }

    pub fn stops(&self) -> u32 {
        self.stops.lock().map(|s| *s).unwrap_or(0)
    }

    /// Whether the last call was a play
    pub fn is_sounding(&self) -> bool {
        self.sounding.lock().map(|s| *s).unwrap_or(false)
    }

    pub fn set_fail_play(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_play.lock() {
            *flag = fail;
        }
    }
}

#[async_trait]
impl AlertPlayer for MockAlertPlayer {
    async fn play_alert(&self) -> HostResult<()> {
        if self.fail_play.lock().map(|f| *f).unwrap_or(false) {
            return Err(HostError::PlaybackFailed("Mock playback failure".into()));
        }
        if let Ok(mut plays) = self.plays.lock() {
            *plays += 1;
        }
        if let Ok(mut sounding) = self.sounding.lock() {
            *sounding = true;
        }
        Ok(())
    }

    async fn stop_alert(&self) -> HostResult<()> {
        if let Ok(mut stops) = self.stops.lock() {
            *stops += 1;
        }
        if let Ok(mut sounding) = self.sounding.lock() {
            *sounding = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_notifier_records() {
        let notifier = MockNotifier::new();
        let handle = notifier.clone();

        notifier
            .notify(Notification::expired(TimerId::new("t-1"), "Tea"))
            .await
            .unwrap();
        notifier.withdraw(&TimerId::new("t-1")).await.unwrap();

        assert_eq!(handle.sent().len(), 1);
        assert_eq!(handle.withdrawn(), vec![TimerId::new("t-1")]);
    }

    #[tokio::test]
    async fn mock_notifier_failure() {
        let notifier = MockNotifier::new();
        notifier.set_fail_notify(true);

        let result = notifier.notify(Notification::warning("x")).await;
        assert!(matches!(result, Err(HostError::NotifyFailed(_))));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn mock_player_counts() {
        let player = MockAlertPlayer::new();

        player.play_alert().await.unwrap();
        player.play_alert().await.unwrap();
        assert!(player.is_sounding());

        player.stop_alert().await.unwrap();
        assert_eq!(player.plays(), 2);
        assert_eq!(player.stops(), 1);
        assert!(!player.is_sounding());
    }
}
