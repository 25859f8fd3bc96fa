//! Heartbeat-driven expiry detection and alert repetition

use countdown_util::TimerId;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::TimerStore;

/// What a heartbeat produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Beat {
    /// A timer reached zero for the first time since it was last reset
    Expired(TimerId),
    /// An active alert run sounds again; `remaining` repeats follow
    AlertRepeat { id: TimerId, remaining: u32 },
}

#[derive(Debug, Clone, Default)]
struct RunMeta {
    ended: bool,
    alert_repeats_left: Option<u32>,
}

/// Per-timer run metadata, advanced once per heartbeat.
///
/// A heartbeat first advances active alert runs, then ticks the store, then
/// reports timers that newly reached zero. An expiry is reported once per
/// run: the ended flag stays set until the timer is reset.
#[derive(Debug)]
pub struct TickDriver {
    repeat_count: u32,
    runs: BTreeMap<TimerId, RunMeta>,
}

impl TickDriver {
    pub fn new(repeat_count: u32) -> Self {
        Self {
            repeat_count,
            runs: BTreeMap::new(),
        }
    }

    pub fn heartbeat(&mut self, store: &mut TimerStore) -> Vec<Beat> {
        let mut beats = Vec::new();

        for (id, meta) in self.runs.iter_mut() {
            let Some(left) = meta.alert_repeats_left else {
                continue;
            };
            let remaining = left.saturating_sub(1);
            beats.push(Beat::AlertRepeat {
                id: id.clone(),
                remaining,
            });
            meta.alert_repeats_left = (remaining > 0).then_some(remaining);
        }

        for id in store.tick() {
            let meta = self.runs.entry(id.clone()).or_default();
            if meta.ended {
                continue;
            }
            meta.ended = true;
            if self.repeat_count > 0 {
                meta.alert_repeats_left = Some(self.repeat_count);
            }
            info!(timer_id = %id, "Timer expired");
            beats.push(Beat::Expired(id));
        }

        self.runs
            .retain(|_, meta| meta.ended || meta.alert_repeats_left.is_some());

        beats
    }

    /// Forget a timer's run. Returns whether an alert run was cancelled.
    pub fn clear(&mut self, id: &TimerId) -> bool {
        match self.runs.remove(id) {
            Some(meta) => {
                debug!(timer_id = %id, "Run metadata cleared");
                meta.alert_repeats_left.is_some()
            }
            None => false,
        }
    }

    /// Acknowledge an expiry. Returns whether an alert run was cancelled.
    pub fn dismiss(&mut self, id: &TimerId) -> bool {
        match self.runs.get_mut(id) {
            Some(meta) if meta.ended && meta.alert_repeats_left.is_some() => {
                meta.alert_repeats_left = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_ended(&self, id: &TimerId) -> bool {
        self.runs.get(id).is_some_and(|m| m.ended)
    }

    pub fn has_active_alerts(&self) -> bool {
        self.runs.values().any(|m| m.alert_repeats_left.is_some())
    }

    /// Whether the alert for `id` is still repeating
    pub fn is_alerting(&self, id: &TimerId) -> bool {
        self.runs
            .get(id)
            .is_some_and(|m| m.alert_repeats_left.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countdown_store::{MemoryStore, TimerSlot};
    use countdown_util::{ManualClock, SequentialIds};
    use std::sync::Arc;

    fn running_store(duration: u32) -> (TimerStore, TimerId) {
        let mut store = TimerStore::new(
            Arc::new(MemoryStore::new()),
            TimerSlot::new("timers"),
            Arc::new(SequentialIds::new("t")),
            Arc::new(ManualClock::new(0)),
        );
        store.add("Tea", "", duration);
        let id = TimerId::new("t-1");
        store.toggle(&id);
        (store, id)
    }

    #[test]
    fn test_expiry_fires_once() {
        let (mut store, id) = running_store(2);
        let mut driver = TickDriver::new(0);

        assert!(driver.heartbeat(&mut store).is_empty());
        assert_eq!(driver.heartbeat(&mut store), vec![Beat::Expired(id.clone())]);
        assert!(driver.is_ended(&id));

        for _ in 0..5 {
            assert!(driver.heartbeat(&mut store).is_empty());
        }
    }

    #[test]
    fn test_alert_repeats_then_stops() {
        let (mut store, id) = running_store(1);
        let mut driver = TickDriver::new(3);

        assert_eq!(driver.heartbeat(&mut store), vec![Beat::Expired(id.clone())]);
        assert!(driver.has_active_alerts());

        let remaining: Vec<u32> = (0..3)
            .flat_map(|_| driver.heartbeat(&mut store))
            .map(|beat| match beat {
                Beat::AlertRepeat { remaining, .. } => remaining,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(remaining, vec![2, 1, 0]);

        assert!(!driver.has_active_alerts());
        assert!(driver.heartbeat(&mut store).is_empty());
    }

    #[test]
    fn test_dismiss_cancels_alert() {
        let (mut store, id) = running_store(1);
        let mut driver = TickDriver::new(5);
        driver.heartbeat(&mut store);
        driver.heartbeat(&mut store);

        assert!(driver.dismiss(&id));
        assert!(!driver.is_alerting(&id));
        assert!(driver.heartbeat(&mut store).is_empty());
        assert!(driver.is_ended(&id));
    }

    #[test]
    fn test_second_dismiss_is_noop() {
        let (mut store, id) = running_store(1);
        let mut driver = TickDriver::new(5);
        driver.heartbeat(&mut store);

        assert!(driver.dismiss(&id));
        assert!(!driver.dismiss(&id));
        assert!(driver.is_ended(&id));
    }

    #[test]
    fn test_dismiss_after_alert_ran_out() {
        let (mut store, id) = running_store(1);
        let mut driver = TickDriver::new(1);
        driver.heartbeat(&mut store);
        driver.heartbeat(&mut store);
        assert!(!driver.has_active_alerts());

        assert!(!driver.dismiss(&id));
    }

    #[test]
    fn test_dismiss_without_expiry() {
        let (_store, id) = running_store(10);
        let mut driver = TickDriver::new(5);
        assert!(!driver.dismiss(&id));
    }

    #[test]
    fn test_clear_allows_second_expiry() {
        let (mut store, id) = running_store(1);
        let mut driver = TickDriver::new(2);
        driver.heartbeat(&mut store);

        assert!(driver.clear(&id));
        assert!(!driver.is_ended(&id));

        store.toggle(&id);
        assert_eq!(driver.heartbeat(&mut store), vec![Beat::Expired(id)]);
    }
}
