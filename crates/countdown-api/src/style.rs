//! Counter styles and how each one encodes a remaining-time value
//!
//! Every style shows all four units. The encodings here are pure data; a
//! render driver turns them into whatever it draws.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::{TimeRemaining, TimeUnit};

/// Visual style of an event's counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterStyle {
    /// Plain numbers with unit labels
    Digital,
    /// Circular progress rings
    Rings,
    /// Split-flap digits
    #[default]
    Flip,
    /// Hourglasses draining per unit
    Hourglass,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown counter style '{0}': expected digital, rings, flip or hourglass")]
pub struct UnknownCounterStyle(pub String);

impl CounterStyle {
    pub const ALL: [CounterStyle; 4] = [
        CounterStyle::Digital,
        CounterStyle::Rings,
        CounterStyle::Flip,
        CounterStyle::Hourglass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CounterStyle::Digital => "digital",
            CounterStyle::Rings => "rings",
            CounterStyle::Flip => "flip",
            CounterStyle::Hourglass => "hourglass",
        }
    }

    /// Label shown under a unit in this style.
    ///
    /// Digital labels agree in number with the value; the other styles use a
    /// fixed short label.
    pub fn label(&self, unit: TimeUnit, value: u64) -> &'static str {
        match self {
            CounterStyle::Digital => {
                let (singular, plural) = match unit {
                    TimeUnit::Days => ("day", "days"),
                    TimeUnit::Hours => ("hour", "hours"),
                    TimeUnit::Minutes => ("min", "mins"),
                    TimeUnit::Seconds => ("sec", "secs"),
                };
                if value == 1 { singular } else { plural }
            }
            CounterStyle::Flip => match unit {
                TimeUnit::Days => "days",
                TimeUnit::Hours => "hours",
                TimeUnit::Minutes => "mins",
                TimeUnit::Seconds => "secs",
            },
            CounterStyle::Rings | CounterStyle::Hourglass => match unit {
                TimeUnit::Days => "days",
                TimeUnit::Hours => "hrs",
                TimeUnit::Minutes => "min",
                TimeUnit::Seconds => "sec",
            },
        }
    }

    /// Encode one unit of `remaining` for this style
    pub fn face(&self, unit: TimeUnit, remaining: &TimeRemaining) -> UnitFace {
        let value = remaining.value(unit);
        let label = self.label(unit, value);
        let encoding = match self {
            CounterStyle::Digital => FaceEncoding::Digital,
            CounterStyle::Flip => FaceEncoding::Flip {
                digits: flip_digits(value, flip_width(unit)),
            },
            CounterStyle::Rings => FaceEncoding::Ring(RingFill::from_percent(
                unit.percent_of_range(value),
            )),
            CounterStyle::Hourglass => FaceEncoding::Hourglass(SandLevels::from_percent(
                unit.percent_of_range(value),
            )),
        };

        UnitFace {
            unit,
            value,
            label,
            encoding,
        }
    }

    /// Encode all four units, largest first
    pub fn faces(&self, remaining: &TimeRemaining) -> [UnitFace; 4] {
        TimeUnit::ALL.map(|unit| self.face(unit, remaining))
    }
}

impl fmt::Display for CounterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CounterStyle {
    type Err = UnknownCounterStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "digital" => Ok(CounterStyle::Digital),
            "rings" => Ok(CounterStyle::Rings),
            "flip" => Ok(CounterStyle::Flip),
            "hourglass" => Ok(CounterStyle::Hourglass),
            other => Err(UnknownCounterStyle(other.to_string())),
        }
    }
}

/// One unit of a counter, encoded for a style
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFace {
    pub unit: TimeUnit,
    pub value: u64,
    pub label: &'static str,
    pub encoding: FaceEncoding,
}

/// Style-specific part of a unit face
#[derive(Debug, Clone, PartialEq)]
pub enum FaceEncoding {
    Digital,
    Flip { digits: String },
    Ring(RingFill),
    Hourglass(SandLevels),
}

/// Minimum number of flip digits per unit
pub fn flip_width(unit: TimeUnit) -> usize {
    match unit {
        TimeUnit::Days => 3,
        _ => 2,
    }
}

/// Zero-pad `value` to at least `width` digits. Wider values keep every digit.
pub fn flip_digits(value: u64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

/// Positions whose digit differs between two flip readings.
///
/// Readings of different length (days crossing 999 -> 1000 or back) are
/// compared right-aligned; every position of the longer reading that has no
/// counterpart counts as changed.
pub fn changed_flip_positions(old: &str, new: &str) -> Vec<usize> {
    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();
    let offset = new.len() as isize - old.len() as isize;

    (0..new.len())
        .filter(|&i| {
            let j = i as isize - offset;
            j < 0 || j >= old.len() as isize || old[j as usize] != new[i]
        })
        .collect()
}

/// Radius of the progress ring in its 100x100 view box
pub const RING_RADIUS: f64 = 45.0;

/// Progress ring fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingFill {
    pub percent: f64,
    /// Dash offset that leaves `percent` of the circumference drawn
    pub stroke_offset: f64,
}

impl RingFill {
    pub fn circumference() -> f64 {
        2.0 * PI * RING_RADIUS
    }

    pub fn from_percent(percent: f64) -> Self {
        let circumference = Self::circumference();
        Self {
            percent,
            stroke_offset: circumference - (percent / 100.0) * circumference,
        }
    }
}

/// Height of a full sand bulb in the hourglass view box
pub const SAND_MAX_HEIGHT: f64 = 34.0;
/// Y coordinate of the hourglass neck
const NECK_Y: f64 = 50.0;
/// Y coordinate of the bottom of the lower bulb
const BASE_Y: f64 = 84.0;

/// Sand geometry of one hourglass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SandLevels {
    /// Remaining share of the unit, in percent
    pub top_fill: f64,
    pub top_height: f64,
    pub top_y: f64,
    pub bottom_height: f64,
    pub bottom_y: f64,
    /// Lower end of the falling stream
    pub stream_end_y: f64,
    pub stream_visible: bool,
}

impl SandLevels {
    pub fn from_percent(percent: f64) -> Self {
        let top_height = (percent / 100.0) * SAND_MAX_HEIGHT;
        let bottom_height = ((100.0 - percent) / 100.0) * SAND_MAX_HEIGHT;
        let bottom_y = BASE_Y - bottom_height;

        Self {
            top_fill: percent,
            top_height,
            top_y: NECK_Y - top_height,
            bottom_height,
            bottom_y,
            stream_end_y: bottom_y.clamp(52.0, 82.0),
            stream_visible: percent > 2.0,
        }
    }

    /// Levels right after a flip: top bulb full, bottom empty
    pub fn refilled() -> Self {
        Self {
            top_fill: 100.0,
            top_height: SAND_MAX_HEIGHT,
            top_y: NECK_Y - SAND_MAX_HEIGHT,
            bottom_height: 0.0,
            bottom_y: BASE_Y,
            stream_end_y: 82.0,
            stream_visible: true,
        }
    }
}

/// Whether an hourglass should play its flip animation.
///
/// This is a heuristic, not exact rollover detection: a unit counts as having
/// wrapped when its value jumped up by more than half its range since the last
/// reading (e.g. seconds going 0 -> 59). Tick intervals longer than half a
/// unit's range can make it miss a wrap or fire on a plain change.
pub fn hourglass_needs_flip(last: u64, value: u64, range: u64) -> bool {
    value as f64 > last as f64 + range as f64 / 2.0
}
