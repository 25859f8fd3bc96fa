//! Shared utilities for countdown
//!
//! This crate provides:
//! - The `TimerId` type and injectable id generators
//! - Injectable clocks (system and manual) plus time formatting helpers
//! - Default paths for the config file and data directory

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
