//! Timer collection and its pure transitions
//!
//! Every change to the collection goes through [`apply`], which takes the
//! current list and an [`Intent`] and returns the next list plus a
//! description of what changed. Ids and timestamps are resolved by the
//! caller, so nothing here touches the clock, the id generator or storage.

use countdown_api::{Timer, TimerUpdate};
use countdown_util::TimerId;

/// Ordered collection of timers, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerList {
    timers: Vec<Timer>,
}

impl TimerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap loaded records verbatim
    pub fn from_timers(timers: Vec<Timer>) -> Self {
        Self { timers }
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, id: &TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Whether a heartbeat would advance anything
    pub fn any_running(&self) -> bool {
        self.timers
            .iter()
            .any(|t| t.is_running && t.remaining_time > 0)
    }

    fn position(&self, id: &TimerId) -> Option<usize> {
        self.timers.iter().position(|t| &t.id == id)
    }
}

/// A requested change to the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Append a timer whose id and creation time are already resolved
    Add(Timer),
    Delete(TimerId),
    Toggle(TimerId),
    /// One second elapses for every running timer
    Tick,
    Restart(TimerId),
    Edit(TimerId, TimerUpdate),
}

impl Intent {
    /// Structural intents change what the collection holds and are persisted.
    pub fn is_structural(&self) -> bool {
        matches!(self, Intent::Add(_) | Intent::Delete(_) | Intent::Edit(..))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intent::Add(_) => "add",
            Intent::Delete(_) => "delete",
            Intent::Toggle(_) => "toggle",
            Intent::Tick => "tick",
            Intent::Restart(_) => "restart",
            Intent::Edit(..) => "edit",
        }
    }
}

/// What an intent did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Unknown id, duplicate id, or nothing to do
    Unchanged,
    Added(TimerId),
    Deleted(Timer),
    Toggled {
        id: TimerId,
        running: bool,
        /// The timer was at zero and was rewound to its full duration
        rewound: bool,
    },
    Ticked {
        /// Timers that reached zero on this tick, in collection order
        expired: Vec<TimerId>,
    },
    Restarted(TimerId),
    Edited(TimerId),
}

impl Change {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Change::Unchanged)
    }
}

/// Result of applying an intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub list: TimerList,
    pub change: Change,
}

impl Transition {
    fn unchanged(list: TimerList) -> Self {
        Self {
            list,
            change: Change::Unchanged,
        }
    }
}

/// Apply an intent to a list
pub fn apply(mut list: TimerList, intent: Intent) -> Transition {
    match intent {
        Intent::Add(timer) => {
            if list.position(&timer.id).is_some() {
                return Transition::unchanged(list);
            }
            let id = timer.id.clone();
            list.timers.push(timer);
            Transition {
                list,
                change: Change::Added(id),
            }
        }

        Intent::Delete(id) => match list.position(&id) {
            Some(idx) => {
                let removed = list.timers.remove(idx);
                Transition {
                    list,
                    change: Change::Deleted(removed),
                }
            }
            None => Transition::unchanged(list),
        },

        Intent::Toggle(id) => {
            let Some(idx) = list.position(&id) else {
                return Transition::unchanged(list);
            };
            let timer = &mut list.timers[idx];

            let rewound = timer.remaining_time == 0;
            if rewound {
                if timer.duration == 0 {
                    return Transition::unchanged(list);
                }
                timer.remaining_time = timer.duration;
                timer.is_running = true;
            } else {
                timer.is_running = !timer.is_running;
            }

            let running = timer.is_running;
            Transition {
                list,
                change: Change::Toggled {
                    id,
                    running,
                    rewound,
                },
            }
        }

        Intent::Tick => {
            let mut expired = Vec::new();
            for timer in list.timers.iter_mut() {
                if !timer.is_running || timer.remaining_time == 0 {
                    continue;
                }
                timer.remaining_time -= 1;
                if timer.remaining_time == 0 {
                    timer.is_running = false;
                    expired.push(timer.id.clone());
                }
            }
            Transition {
                list,
                change: Change::Ticked { expired },
            }
        }

        Intent::Restart(id) => {
            let Some(idx) = list.position(&id) else {
                return Transition::unchanged(list);
            };
            let timer = &mut list.timers[idx];
            timer.remaining_time = timer.duration;
            timer.is_running = false;
            Transition {
                list,
                change: Change::Restarted(id),
            }
        }

        Intent::Edit(id, update) => {
            let Some(idx) = list.position(&id) else {
                return Transition::unchanged(list);
            };
            let timer = &mut list.timers[idx];

            if let Some(title) = update.title {
                timer.title = title;
            }
            if let Some(description) = update.description {
                timer.description = description;
            }
            // A zero duration keeps the current one
            if let Some(duration) = update.duration
                && duration > 0
            {
                timer.duration = duration;
            }
            timer.remaining_time = timer.duration;
            timer.is_running = false;

            Transition {
                list,
                change: Change::Edited(id),
            }
        }
    }
}
