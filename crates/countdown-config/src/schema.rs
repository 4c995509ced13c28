//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Display-wide settings
    #[serde(default)]
    pub display: RawDisplayConfig,

    /// Events to count down to
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// Display-wide settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDisplayConfig {
    /// Render with per-event colours (false renders grayscale)
    pub color_mode: Option<bool>,

    /// Hours an arrived event stays on display before it is dropped
    pub show_passed_events_for_hours: Option<f64>,

    /// Tick interval in milliseconds
    pub update_interval_ms: Option<u64>,

    /// How often the displayed set is re-evaluated, in milliseconds.
    /// Defaults to the tick interval.
    pub eligibility_interval_ms: Option<u64>,

    /// Counter style for events that don't pick one
    pub default_counter_style: Option<String>,

    /// Emojis for celebrations unless an event overrides them
    pub default_celebration_emojis: Option<Vec<String>>,

    /// Number of particles in a celebration
    pub celebration_particle_count: Option<u32>,
}

/// Raw event definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawEvent {
    /// Optional explicit stable id (otherwise derived from name and date)
    pub id: Option<String>,

    /// Display name
    pub name: String,

    /// Target date "YYYY-MM-DD", or a full "YYYY-MM-DDTHH:MM[:SS]" timestamp
    pub date: String,

    /// Target time "HH:MM" or "HH:MM:SS" (ignored when `date` has a time part)
    pub time: Option<String>,

    /// Emoji shown above the name
    pub icon: Option<String>,

    /// "digital", "rings", "flip" or "hourglass"
    pub counter_style: Option<String>,

    /// Hex colour of the event name
    pub text_color: Option<String>,

    /// Hex colour of accents and the arrival glow
    pub accent_color: Option<String>,

    /// Hex colour of counter numbers and labels
    pub counter_text_color: Option<String>,

    /// Show a celebration when the event arrives
    #[serde(default = "default_celebrate")]
    pub celebrate_on_day: bool,

    /// Emojis for this event's celebration
    pub celebration_emojis: Option<Vec<String>>,
}

fn default_celebrate() -> bool {
    true
}
