//! Host capability traits for the countdown service
//!
//! This crate defines the capability-based interface between the countdown
//! core and whatever hosts it: where "now" comes from, what re-invokes the
//! tick, and what draws the result. It contains no rendering or timer code
//! itself beyond the system clock and test doubles.

mod clock;
mod handle;
mod mock;
mod traits;

pub use clock::*;
pub use handle::*;
pub use mock::*;
pub use traits::*;
