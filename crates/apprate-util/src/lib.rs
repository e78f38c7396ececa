//! Shared utilities for apprate
//!
//! This crate provides:
//! - Time utilities (wall-clock access with debug mock time, whole-day arithmetic)
//! - Default paths for the config file and data directory

mod paths;
mod time;

pub use paths::*;
pub use time::*;
