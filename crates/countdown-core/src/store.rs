//! Timer store: the live collection plus its durable slot

use countdown_api::{Timer, TimerUpdate};
use countdown_store::{Store, TimerSlot};
use countdown_util::{Clock, IdGenerator, TimerId};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{Change, Intent, TimerList, apply};

/// Whether an intent's result reached durable storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    /// Nothing needed saving
    NotRequired,
    Saved,
    /// The in-memory change stands but was not saved
    Failed(String),
}

/// What a store operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub change: Change,
    pub persist: PersistStatus,
}

impl Outcome {
    pub fn changed(&self) -> bool {
        !self.change.is_unchanged()
    }

    pub fn persist_error(&self) -> Option<&str> {
        match &self.persist {
            PersistStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Owns the timer collection.
///
/// Structural changes (add, edit, delete) are written through to the slot
/// synchronously; toggle, restart and tick only change memory.
pub struct TimerStore {
    list: TimerList,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    store: Arc<dyn Store>,
    slot: TimerSlot,
}

impl TimerStore {
    pub fn new(
        store: Arc<dyn Store>,
        slot: TimerSlot,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            list: TimerList::new(),
            ids,
            clock,
            store,
            slot,
        }
    }

    /// Replace the collection with whatever the slot holds. Never fails.
    pub fn load(&mut self) -> usize {
        self.list = TimerList::from_timers(self.slot.load(self.store.as_ref()));
        self.list.len()
    }

    pub fn timers(&self) -> &[Timer] {
        self.list.timers()
    }

    pub fn get(&self, id: &TimerId) -> Option<&Timer> {
        self.list.get(id)
    }

    pub fn list(&self) -> &TimerList {
        &self.list
    }

    pub fn any_running(&self) -> bool {
        self.list.any_running()
    }

    /// Append a new stopped timer. Inputs are assumed to be validated.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        duration: u32,
    ) -> Outcome {
        let timer = Timer::new(
            self.ids.next_id(),
            title,
            description,
            duration,
            self.clock.now_ms(),
        );
        self.run(Intent::Add(timer))
    }

    pub fn delete(&mut self, id: &TimerId) -> Outcome {
        self.run(Intent::Delete(id.clone()))
    }

    pub fn toggle(&mut self, id: &TimerId) -> Outcome {
        self.run(Intent::Toggle(id.clone()))
    }

    pub fn restart(&mut self, id: &TimerId) -> Outcome {
        self.run(Intent::Restart(id.clone()))
    }

    pub fn edit(&mut self, id: &TimerId, update: TimerUpdate) -> Outcome {
        self.run(Intent::Edit(id.clone(), update))
    }

    /// Advance every running timer by one second; returns the ids that
    /// reached zero.
    pub fn tick(&mut self) -> Vec<TimerId> {
        match self.run(Intent::Tick).change {
            Change::Ticked { expired } => expired,
            _ => Vec::new(),
        }
    }

    fn run(&mut self, intent: Intent) -> Outcome {
        let name = intent.name();
        let structural = intent.is_structural();

        let transition = apply(std::mem::take(&mut self.list), intent);
        self.list = transition.list;
        let change = transition.change;

        if change.is_unchanged() {
            debug!(intent = name, "No matching timer, nothing changed");
            return Outcome {
                change,
                persist: PersistStatus::NotRequired,
            };
        }

        let persist = if structural {
            self.persist()
        } else {
            PersistStatus::NotRequired
        };

        Outcome { change, persist }
    }

    fn persist(&self) -> PersistStatus {
        match self.slot.save(self.store.as_ref(), self.list.timers()) {
            Ok(()) => PersistStatus::Saved,
            Err(e) => {
                warn!(key = %self.slot.key(), error = %e, "Failed to save timers");
                PersistStatus::Failed(e.to_string())
            }
        }
    }
}
