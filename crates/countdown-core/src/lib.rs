//! Core countdown engine
//!
//! This crate is the heart of the countdown service, containing:
//! - The remaining-time calculator (fixed-radix days/hours/minutes/seconds)
//! - The eligibility filter (retention window, ordering by target)
//! - Per-event arrival latches keyed by stable event keys
//! - Tick orchestration producing `DisplayUpdate`s for a render driver

mod arrival;
mod eligibility;
mod engine;
mod remaining;

pub use arrival::*;
pub use eligibility::*;
pub use engine::*;
pub use remaining::*;
