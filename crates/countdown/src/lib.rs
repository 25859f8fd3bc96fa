//! countdown session wiring
//!
//! The binary's moving parts, kept in a library so they can be driven from
//! integration tests:
//! - `App`: turns commands and heartbeats into protocol events
//! - Construction of the engine from validated settings
//! - Human-readable rendering for the one-shot subcommands

mod app;
mod render;

pub use app::*;
pub use render::*;
