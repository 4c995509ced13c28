//! Display updates streamed from the countdown core to a render driver

use chrono::{DateTime, Local};
use countdown_util::EventKey;
use serde::{Deserialize, Serialize};

use crate::{API_VERSION, CounterStyle, EventColors, TimeRemaining};

/// Envelope written by drivers that forward updates out of process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEnvelope {
    pub api_version: u32,
    pub timestamp: DateTime<Local>,
    pub update: DisplayUpdate,
}

impl UpdateEnvelope {
    pub fn new(timestamp: DateTime<Local>, update: DisplayUpdate) -> Self {
        Self {
            api_version: API_VERSION,
            timestamp,
            update,
        }
    }
}

/// One change the render layer has to apply.
///
/// Within a tick a `Rebuild` (or `NothingScheduled`) always comes before any
/// per-event update, and per-event updates follow the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayUpdate {
    /// The set of displayed events changed; discard the current display and
    /// build it from this list (ascending by target)
    Rebuild { events: Vec<EventView> },

    /// No event is eligible for display
    NothingScheduled,

    /// New numbers for an event that has not arrived yet
    Refresh {
        key: EventKey,
        remaining: TimeRemaining,
    },

    /// The event reached its target on this tick. Sent exactly once per
    /// event while it stays displayed; the counter freezes at zero.
    Arrived {
        key: EventKey,
        celebration: Option<Celebration>,
    },
}

impl DisplayUpdate {
    /// Event this update targets, if it targets a single event
    pub fn key(&self) -> Option<EventKey> {
        match self {
            DisplayUpdate::Refresh { key, .. } | DisplayUpdate::Arrived { key, .. } => Some(*key),
            DisplayUpdate::Rebuild { .. } | DisplayUpdate::NothingScheduled => None,
        }
    }
}

/// Everything needed to build one event's display from scratch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventView {
    pub key: EventKey,
    pub name: String,
    pub icon: Option<String>,
    pub target: DateTime<Local>,
    pub style: CounterStyle,
    pub colors: EventColors,
    /// Remaining time when the view was built
    pub remaining: TimeRemaining,
    /// Whether the event had already arrived when the view was built
    pub arrived: bool,
    /// Celebration to show while arrived, if enabled for this event
    pub celebration: Option<Celebration>,
}

/// Celebration effect parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub emojis: Vec<String>,
    pub particle_count: u32,
}
