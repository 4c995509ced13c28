//! Render-facing types for the countdown service
//!
//! This crate defines the stable boundary between the countdown core and
//! whatever draws the countdowns:
//! - The remaining-time value and its unit decomposition
//! - Counter styles and the per-style encoding of each unit
//! - Display updates emitted once per tick (refresh, arrival, rebuild)
//! - Versioning

mod events;
mod style;
mod types;

pub use events::*;
pub use style::*;
pub use types::*;

/// Current display-update format version
pub const API_VERSION: u32 = 1;
