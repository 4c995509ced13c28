//! Shared utilities for the countdown service
//!
//! This crate provides:
//! - Stable event keys
//! - Time utilities (mock-aware wall clock, local-time resolution, formatting)
//! - Default paths for the configuration file

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
