//! Collaborator interfaces for countdown
//!
//! This crate defines the boundary between the timer core and whatever
//! surfaces expiry to the user: a notifier and an audible alert player.
//! It contains no platform code itself.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;
