//! Render drivers for countdownd

mod json;
mod terminal;

pub use json::JsonRenderer;
pub use terminal::TerminalRenderer;
