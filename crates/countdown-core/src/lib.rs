//! Timer state machine, tick driver and validation for countdown
//!
//! This crate is the heart of countdown, containing:
//! - The timer collection and its pure transitions
//! - The store that owns the collection and writes structural changes through
//! - The tick driver (expiry detection, alert repetition)
//! - Form validation
//! - The engine tying them together, and dispatch of expiry events

mod dispatch;
mod engine;
mod events;
mod state;
mod store;
mod ticker;
mod validation;

pub use dispatch::*;
pub use engine::*;
pub use events::*;
pub use state::*;
pub use store::*;
pub use ticker::*;
pub use validation::*;
