//! Terminal collaborators for countdown
//!
//! Provides:
//! - A notifier that writes expiry banners and warnings to stderr
//! - An alert player that runs a sound-player process, or rings the bell
//! - Sound process spawning and termination

mod notifier;
mod player;
mod process;

pub use notifier::*;
pub use player::*;
pub use process::*;
