//! Core timer engine

use countdown_api::{Timer, TimerUpdate, TimerView};
use countdown_util::TimerId;
use tracing::{debug, info, warn};

use crate::{
    Beat, Change, CoreEvent, Outcome, TickDriver, TimerForm, TimerStore, ValidationReporter, gate,
};

/// The core timer engine.
///
/// Owns the collection and the tick driver. Every intent goes through one
/// method here and comes back as a list of events for the caller to render
/// and dispatch.
pub struct CoreEngine {
    store: TimerStore,
    ticker: TickDriver,
}

impl CoreEngine {
    /// Create a new core engine
    pub fn new(store: TimerStore, repeat_count: u32) -> Self {
        info!(repeat_count, "Core engine initialized");
        Self {
            store,
            ticker: TickDriver::new(repeat_count),
        }
    }

    /// Load the saved collection, replacing whatever is in memory
    pub fn load(&mut self) -> usize {
        let count = self.store.load();
        info!(count, "Timers loaded");
        count
    }

    pub fn timers(&self) -> &[Timer] {
        self.store.timers()
    }

    pub fn get(&self, id: &TimerId) -> Option<&Timer> {
        self.store.get(id)
    }

    /// Every timer with its display values, in insertion order
    pub fn list(&self) -> Vec<TimerView> {
        self.store.timers().iter().map(TimerView::from).collect()
    }

    /// Whether the heartbeat has anything to do
    pub fn needs_heartbeat(&self) -> bool {
        self.store.any_running() || self.ticker.has_active_alerts()
    }

    pub fn is_ended(&self, id: &TimerId) -> bool {
        self.ticker.is_ended(id)
    }

    pub fn add(&mut self, form: &TimerForm, reporter: &mut dyn ValidationReporter) -> Vec<CoreEvent> {
        let Some(duration) = gate(form, reporter) else {
            return Vec::new();
        };

        let outcome = self.store.add(
            form.trimmed_title(),
            form.trimmed_description(),
            duration,
        );

        let mut events = Vec::new();
        if let Change::Added(id) = &outcome.change
            && let Some(timer) = self.store.get(id)
        {
            info!(timer_id = %id, title = %timer.title, duration, "Timer added");
            events.push(CoreEvent::TimerAdded {
                timer: timer.clone(),
            });
        }
        push_persist_failure(&mut events, &outcome, "add");
        events
    }

    pub fn edit(
        &mut self,
        id: &TimerId,
        form: &TimerForm,
        reporter: &mut dyn ValidationReporter,
    ) -> Vec<CoreEvent> {
        if self.store.get(id).is_none() {
            debug!(timer_id = %id, "Edit of unknown timer ignored");
            return Vec::new();
        }

        let Some(duration) = gate(form, reporter) else {
            return Vec::new();
        };

        let update = TimerUpdate {
            title: Some(form.trimmed_title().to_string()),
            description: Some(form.trimmed_description().to_string()),
            duration: Some(duration),
        };
        let outcome = self.store.edit(id, update);

        let mut events = Vec::new();
        if let Some(timer) = self.store.get(id).cloned()
            && outcome.changed()
        {
            info!(timer_id = %id, duration, "Timer edited");
            events.push(CoreEvent::TimerEdited { timer });
            self.reset_run(id, &mut events);
        }
        push_persist_failure(&mut events, &outcome, "edit");
        events
    }

    pub fn delete(&mut self, id: &TimerId) -> Vec<CoreEvent> {
        let outcome = self.store.delete(id);

        let mut events = Vec::new();
        match &outcome.change {
            Change::Deleted(timer) => {
                info!(timer_id = %id, title = %timer.title, "Timer deleted");
                events.push(CoreEvent::TimerDeleted {
                    id: id.clone(),
                    title: timer.title.clone(),
                });
                self.reset_run(id, &mut events);
            }
            _ => debug!(timer_id = %id, "Delete of unknown timer ignored"),
        }
        push_persist_failure(&mut events, &outcome, "delete");
        events
    }

    pub fn toggle(&mut self, id: &TimerId) -> Vec<CoreEvent> {
        let outcome = self.store.toggle(id);

        let mut events = Vec::new();
        match (&outcome.change, self.store.get(id).cloned()) {
            (Change::Toggled { running, rewound, .. }, Some(timer)) => {
                info!(timer_id = %id, running, rewound, "Timer toggled");
                events.push(CoreEvent::TimerToggled {
                    timer,
                    rewound: *rewound,
                });
                if *rewound {
                    self.reset_run(id, &mut events);
                }
            }
            _ => debug!(timer_id = %id, "Toggle of unknown timer ignored"),
        }
        events
    }

    pub fn restart(&mut self, id: &TimerId) -> Vec<CoreEvent> {
        let outcome = self.store.restart(id);

        let mut events = Vec::new();
        match (&outcome.change, self.store.get(id).cloned()) {
            (Change::Restarted(_), Some(timer)) => {
                info!(timer_id = %id, "Timer restarted");
                events.push(CoreEvent::TimerRestarted { timer });
                self.reset_run(id, &mut events);
            }
            _ => debug!(timer_id = %id, "Restart of unknown timer ignored"),
        }
        events
    }

    /// Acknowledge an expiry and silence its alert
    pub fn dismiss(&mut self, id: &TimerId) -> Vec<CoreEvent> {
        if self.ticker.dismiss(id) {
            info!(timer_id = %id, "Expiry dismissed");
            vec![CoreEvent::AlertCancelled { id: id.clone() }]
        } else {
            debug!(timer_id = %id, "Nothing to dismiss");
            Vec::new()
        }
    }

    /// One heartbeat: advance alerts, tick running timers, report expiries
    pub fn tick(&mut self) -> Vec<CoreEvent> {
        self.ticker
            .heartbeat(&mut self.store)
            .into_iter()
            .filter_map(|beat| match beat {
                Beat::Expired(id) => {
                    let Some(timer) = self.store.get(&id) else {
                        warn!(timer_id = %id, "Expired timer vanished");
                        return None;
                    };
                    Some(CoreEvent::Expired {
                        title: timer.title.clone(),
                        id,
                    })
                }
                Beat::AlertRepeat { id, remaining } => {
                    debug!(timer_id = %id, remaining, "Alert repeat");
                    Some(CoreEvent::AlertRepeat { id, remaining })
                }
            })
            .collect()
    }

    fn reset_run(&mut self, id: &TimerId, events: &mut Vec<CoreEvent>) {
        if self.ticker.clear(id) {
            events.push(CoreEvent::AlertCancelled { id: id.clone() });
        }
    }
}

fn push_persist_failure(events: &mut Vec<CoreEvent>, outcome: &Outcome, operation: &'static str) {
    if let Some(error) = outcome.persist_error() {
        events.push(CoreEvent::PersistFailed {
            operation,
            error: error.to_string(),
        });
    }
}
