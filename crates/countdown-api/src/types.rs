//! Shared types for the countdown API

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MS_PER_SECOND: i64 = 1000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time left until a target, split into fixed-radix fields.
///
/// Each field is the remainder after the larger units are taken out, so
/// `days` is unbounded while `hours < 24` and `minutes, seconds < 60`.
/// Once the target is reached every field is zero and `arrived` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub total_ms: u64,
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub arrived: bool,
}

impl TimeRemaining {
    /// The zero state of an event whose target has been reached
    pub const ARRIVED: TimeRemaining = TimeRemaining {
        total_ms: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        arrived: true,
    };

    /// Decompose a signed millisecond count. Anything `<= 0` is arrival.
    pub fn from_millis(total_ms: i64) -> Self {
        if total_ms <= 0 {
            return Self::ARRIVED;
        }

        Self {
            total_ms: total_ms as u64,
            days: (total_ms / MS_PER_DAY) as u64,
            hours: ((total_ms / MS_PER_HOUR) % 24) as u8,
            minutes: ((total_ms / MS_PER_MINUTE) % 60) as u8,
            seconds: ((total_ms / MS_PER_SECOND) % 60) as u8,
            arrived: false,
        }
    }

    /// Value of a single unit field
    pub fn value(&self, unit: TimeUnit) -> u64 {
        match unit {
            TimeUnit::Days => self.days,
            TimeUnit::Hours => self.hours as u64,
            TimeUnit::Minutes => self.minutes as u64,
            TimeUnit::Seconds => self.seconds as u64,
        }
    }
}

/// The four counter units, largest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
    ];

    /// Full range of the unit for proportional encodings.
    /// Days are measured against a year and clamp above it.
    pub fn range(self) -> u64 {
        match self {
            TimeUnit::Days => 365,
            TimeUnit::Hours => 24,
            TimeUnit::Minutes | TimeUnit::Seconds => 60,
        }
    }

    /// Share of the unit's range covered by `value`, in percent (0..=100)
    pub fn percent_of_range(self, value: u64) -> f64 {
        let percent = value as f64 / self.range() as f64 * 100.0;
        percent.min(100.0)
    }
}

/// Error returned when a colour string is not `#rgb` or `#rrggbb`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex colour '{0}': expected #rgb or #rrggbb")]
pub struct HexColorError(pub String);

/// An RGB colour written as hex in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness, used for grayscale rendering
    pub fn luma(&self) -> u8 {
        let y = 0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64;
        y.round().clamp(0.0, 255.0) as u8
    }
}

impl FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || HexColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-event colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventColors {
    /// Event name
    pub text: HexColor,
    /// Accent elements and the arrival glow
    pub accent: HexColor,
    /// Counter numbers and labels
    pub counter_text: HexColor,
}

impl Default for EventColors {
    fn default() -> Self {
        Self {
            text: HexColor::new(0xff, 0xd7, 0x00),
            accent: HexColor::new(0xff, 0xd7, 0x00),
            counter_text: HexColor::new(0xff, 0xff, 0xff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_into_fixed_radix_fields() {
        // 1 day, 11 hours, 29 minutes, 45 seconds, 500 ms
        let ms = MS_PER_DAY + 11 * MS_PER_HOUR + 29 * MS_PER_MINUTE + 45 * MS_PER_SECOND + 500;
        let remaining = TimeRemaining::from_millis(ms);

        assert_eq!(remaining.total_ms, ms as u64);
        assert_eq!(remaining.days, 1);
        assert_eq!(remaining.hours, 11);
        assert_eq!(remaining.minutes, 29);
        assert_eq!(remaining.seconds, 45);
        assert!(!remaining.arrived);
    }

    #[test]
    fn sub_second_remainder_is_not_arrival() {
        let remaining = TimeRemaining::from_millis(999);
        assert!(!remaining.arrived);
        assert_eq!(remaining.seconds, 0);
        assert_eq!(remaining.total_ms, 999);
    }

    #[test]
    fn zero_and_negative_are_arrival() {
        assert_eq!(TimeRemaining::from_millis(0), TimeRemaining::ARRIVED);
        assert_eq!(TimeRemaining::from_millis(-5_000), TimeRemaining::ARRIVED);
    }

    #[test]
    fn days_percent_clamps_at_a_year() {
        assert_eq!(TimeUnit::Days.percent_of_range(730), 100.0);
        assert_eq!(TimeUnit::Hours.percent_of_range(12), 50.0);
        assert_eq!(TimeUnit::Seconds.percent_of_range(0), 0.0);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#ffd700".parse::<HexColor>().unwrap(), HexColor::new(255, 215, 0));
        assert_eq!("#fff".parse::<HexColor>().unwrap(), HexColor::new(255, 255, 255));
        assert_eq!("#FfD700".parse::<HexColor>().unwrap().to_string(), "#ffd700");

        assert!("ffd700".parse::<HexColor>().is_err());
        assert!("#ffd70".parse::<HexColor>().is_err());
        assert!("#gggggg".parse::<HexColor>().is_err());
        assert!("#ééé".parse::<HexColor>().is_err());
    }

    #[test]
    fn hex_color_serializes_as_string() {
        let json = serde_json::to_string(&HexColor::new(0, 128, 255)).unwrap();
        assert_eq!(json, "\"#0080ff\"");
        let parsed: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, HexColor::new(0, 128, 255));
    }
}
