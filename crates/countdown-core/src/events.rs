//! Core events emitted by the engine

use countdown_api::Timer;
use countdown_util::TimerId;

/// Events emitted by the core engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    TimerAdded {
        timer: Timer,
    },

    TimerEdited {
        timer: Timer,
    },

    TimerDeleted {
        id: TimerId,
        title: String,
    },

    /// Started or paused
    TimerToggled {
        timer: Timer,
        /// Started again from the full duration after reaching zero
        rewound: bool,
    },

    TimerRestarted {
        timer: Timer,
    },

    /// Timer reached zero (once per run)
    Expired {
        id: TimerId,
        title: String,
    },

    /// Expiry alert sounds again
    AlertRepeat {
        id: TimerId,
        remaining: u32,
    },

    /// Expiry alert silenced by dismiss or reset
    AlertCancelled {
        id: TimerId,
    },

    /// The change was applied in memory but not saved
    PersistFailed {
        operation: &'static str,
        error: String,
    },
}
