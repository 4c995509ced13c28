//! Validated configuration structures

use crate::schema::{RawConfig, RawDisplayConfig, RawEvent};
use crate::validation::{ValidationError, event_key, parse_event_date};
use chrono::{DateTime, Local};
use countdown_api::{Celebration, CounterStyle, EventColors};
use countdown_util::EventKey;
use std::time::Duration;

pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_RETENTION_HOURS: f64 = 24.0;
pub const DEFAULT_PARTICLE_COUNT: u32 = 30;

pub fn default_celebration_emojis() -> Vec<String> {
    vec!["🎉".into(), "🌟".into(), "🍾".into()]
}

/// Validated configuration ready for use by the countdown engine
#[derive(Debug, Clone)]
pub struct CountdownConfig {
    pub display: DisplaySettings,

    /// Events in configuration order
    pub events: Vec<EventSpec>,

    /// Non-fatal findings from validation (e.g. unresolvable dates)
    pub warnings: Vec<ValidationError>,
}

impl CountdownConfig {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig, warnings: Vec<ValidationError>) -> Self {
        let display = DisplaySettings::from_raw(&raw.display);
        let events = raw
            .events
            .into_iter()
            .map(|e| EventSpec::from_raw(e, display.default_style))
            .collect();

        Self {
            display,
            events,
            warnings,
        }
    }
}

/// Display-wide settings
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    /// Render with per-event colours
    pub color_mode: bool,
    /// How long an arrived event stays displayed
    pub retention_window: Duration,
    /// Tick interval
    pub update_interval: Duration,
    /// Interval between eligibility passes (never shorter than a tick)
    pub eligibility_interval: Duration,
    pub default_style: CounterStyle,
    pub default_celebration_emojis: Vec<String>,
    pub celebration_particle_count: u32,
}

impl DisplaySettings {
    fn from_raw(raw: &RawDisplayConfig) -> Self {
        let retention_hours = raw
            .show_passed_events_for_hours
            .unwrap_or(DEFAULT_RETENTION_HOURS);
        let update_ms = raw.update_interval_ms.unwrap_or(DEFAULT_UPDATE_INTERVAL_MS);
        let eligibility_ms = raw.eligibility_interval_ms.unwrap_or(update_ms);

        Self {
            color_mode: raw.color_mode.unwrap_or(true),
            retention_window: hours_to_duration(retention_hours),
            update_interval: Duration::from_millis(update_ms),
            eligibility_interval: Duration::from_millis(eligibility_ms),
            default_style: raw
                .default_counter_style
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            default_celebration_emojis: raw
                .default_celebration_emojis
                .clone()
                .unwrap_or_else(default_celebration_emojis),
            celebration_particle_count: raw
                .celebration_particle_count
                .unwrap_or(DEFAULT_PARTICLE_COUNT),
        }
    }

    /// Celebration shown when `event` arrives, if it celebrates at all
    pub fn celebration_for(&self, event: &EventSpec) -> Option<Celebration> {
        if !event.celebrate_on_day {
            return None;
        }

        Some(Celebration {
            emojis: event
                .celebration_emojis
                .clone()
                .unwrap_or_else(|| self.default_celebration_emojis.clone()),
            particle_count: self.celebration_particle_count,
        })
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::from_raw(&RawDisplayConfig::default())
    }
}

/// Convert fractional hours to a Duration, saturating on overflow
fn hours_to_duration(hours: f64) -> Duration {
    Duration::try_from_secs_f64(hours * 3600.0).unwrap_or(Duration::MAX)
}

/// A configured event
#[derive(Debug, Clone, PartialEq)]
pub struct EventSpec {
    pub key: EventKey,
    pub name: String,
    /// Raw date as configured, kept for diagnostics
    pub date: String,
    /// Raw time as configured, kept for diagnostics
    pub time: Option<String>,
    /// Resolved target. None when the date/time could not be resolved.
    pub target: Option<DateTime<Local>>,
    pub icon: Option<String>,
    pub style: CounterStyle,
    pub colors: EventColors,
    pub celebrate_on_day: bool,
    pub celebration_emojis: Option<Vec<String>>,
}

impl EventSpec {
    /// Event with a resolved target and default presentation
    pub fn new(name: impl Into<String>, target: DateTime<Local>) -> Self {
        let name = name.into();
        let date = target.to_rfc3339();
        Self {
            key: EventKey::from_name_and_target(&name, &date, None),
            name,
            date,
            time: None,
            target: Some(target),
            icon: None,
            style: CounterStyle::default(),
            colors: EventColors::default(),
            celebrate_on_day: true,
            celebration_emojis: None,
        }
    }

    /// Event whose date could not be resolved
    pub fn unresolved(name: impl Into<String>, date: impl Into<String>) -> Self {
        let name = name.into();
        let date = date.into();
        Self {
            key: EventKey::from_name_and_target(&name, &date, None),
            name,
            date,
            time: None,
            target: None,
            icon: None,
            style: CounterStyle::default(),
            colors: EventColors::default(),
            celebrate_on_day: true,
            celebration_emojis: None,
        }
    }

    pub fn with_celebration(mut self, enabled: bool) -> Self {
        self.celebrate_on_day = enabled;
        self
    }

    fn from_raw(raw: RawEvent, default_style: CounterStyle) -> Self {
        let key = event_key(&raw);
        let target = parse_event_date(&raw.date, raw.time.as_deref()).ok();

        let defaults = EventColors::default();
        let color = |value: &Option<String>, fallback| {
            value
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback)
        };
        let colors = EventColors {
            text: color(&raw.text_color, defaults.text),
            accent: color(&raw.accent_color, defaults.accent),
            counter_text: color(&raw.counter_text_color, defaults.counter_text),
        };

        Self {
            key,
            name: raw.name,
            date: raw.date,
            time: raw.time,
            target,
            icon: raw.icon,
            style: raw
                .counter_style
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default_style),
            colors,
            celebrate_on_day: raw.celebrate_on_day,
            celebration_emojis: raw.celebration_emojis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use countdown_api::HexColor;

    #[test]
    fn display_defaults() {
        let display = DisplaySettings::default();
        assert!(display.color_mode);
        assert_eq!(display.retention_window, Duration::from_secs(24 * 3600));
        assert_eq!(display.update_interval, Duration::from_millis(1000));
        assert_eq!(display.eligibility_interval, display.update_interval);
        assert_eq!(display.default_style, CounterStyle::Flip);
        assert_eq!(display.default_celebration_emojis.len(), 3);
        assert_eq!(display.celebration_particle_count, 30);
    }

    #[test]
    fn fractional_retention_hours() {
        let raw = RawDisplayConfig {
            show_passed_events_for_hours: Some(1.5),
            ..Default::default()
        };
        let display = DisplaySettings::from_raw(&raw);
        assert_eq!(display.retention_window, Duration::from_secs(5400));
    }

    #[test]
    fn celebration_uses_event_emojis_or_default() {
        let display = DisplaySettings::default();
        let target = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        let plain = EventSpec::new("A", target);
        let celebration = display.celebration_for(&plain).unwrap();
        assert_eq!(celebration.emojis, default_celebration_emojis());
        assert_eq!(celebration.particle_count, 30);

        let mut custom = EventSpec::new("B", target);
        custom.celebration_emojis = Some(vec!["🎂".into()]);
        assert_eq!(display.celebration_for(&custom).unwrap().emojis, vec!["🎂"]);

        let quiet = EventSpec::new("C", target).with_celebration(false);
        assert!(display.celebration_for(&quiet).is_none());
    }

    #[test]
    fn event_from_raw_applies_overrides() {
        let raw = RawEvent {
            id: None,
            name: "Launch".into(),
            date: "2025-03-14".into(),
            time: Some("09:30".into()),
            icon: Some("🚀".into()),
            counter_style: None,
            text_color: Some("#0f0".into()),
            accent_color: None,
            counter_text_color: None,
            celebrate_on_day: true,
            celebration_emojis: None,
        };

        let spec = EventSpec::from_raw(raw, CounterStyle::Hourglass);
        assert_eq!(spec.style, CounterStyle::Hourglass);
        assert_eq!(spec.colors.text, HexColor::new(0, 255, 0));
        assert_eq!(spec.colors.accent, EventColors::default().accent);
        assert_eq!(
            spec.target,
            Some(Local.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap())
        );
        assert_eq!(
            spec.key,
            EventKey::from_name_and_target("Launch", "2025-03-14", Some("09:30"))
        );
    }
}
