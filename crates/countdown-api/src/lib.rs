//! Protocol types for countdown
//!
//! This crate defines the stable shapes shared by every other crate:
//! - The persisted `Timer` record and its derived view
//! - Commands (one JSON object per stdin line)
//! - Events (one JSON envelope per stdout line)
//! - Versioning

mod commands;
mod events;
mod types;

pub use commands::*;
pub use events::*;
pub use types::*;

/// Current API version
pub const API_VERSION: u32 = 1;
