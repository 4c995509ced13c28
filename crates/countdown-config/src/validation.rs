//! Configuration validation

use crate::schema::{RawConfig, RawDisplayConfig, RawEvent};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use countdown_api::{CounterStyle, HexColor};
use countdown_util::{EventKey, resolve_local};
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Event '{event}': {message}")]
    EventError { event: String, message: String },

    #[error("Duplicate event '{0}': events need a unique id or a unique name and date")]
    DuplicateEvent(String),

    #[error("Event '{event}': invalid {field} '{value}'")]
    InvalidColor {
        event: String,
        field: &'static str,
        value: String,
    },

    #[error("Event '{event}': cannot resolve date '{value}': {message}")]
    InvalidDate {
        event: String,
        value: String,
        message: String,
    },

    #[error("Display config error: {0}")]
    DisplayError(String),
}

impl ValidationError {
    /// Whether this error rejects the whole configuration.
    ///
    /// An unresolvable date only affects its own event: the event is loaded
    /// without a target and never becomes eligible for display.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ValidationError::InvalidDate { .. })
    }
}

/// Stable key for a raw event
pub fn event_key(event: &RawEvent) -> EventKey {
    match &event.id {
        Some(id) => EventKey::from_id(id),
        None => EventKey::from_name_and_target(&event.name, &event.date, event.time.as_deref()),
    }
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = validate_display(&config.display);

    // Check for duplicate event keys
    let mut seen = HashSet::new();
    for event in &config.events {
        if !seen.insert(event_key(event)) {
            errors.push(ValidationError::DuplicateEvent(
                event.id.clone().unwrap_or_else(|| event.name.clone()),
            ));
        }
    }

    for event in &config.events {
        errors.extend(validate_event(event));
    }

    errors
}

fn validate_display(display: &RawDisplayConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(hours) = display.show_passed_events_for_hours
        && (!hours.is_finite() || hours < 0.0)
    {
        errors.push(ValidationError::DisplayError(format!(
            "show_passed_events_for_hours must be a non-negative number, got {}",
            hours
        )));
    }

    if display.update_interval_ms == Some(0) {
        errors.push(ValidationError::DisplayError(
            "update_interval_ms must be greater than 0".into(),
        ));
    }

    let update_ms = display.update_interval_ms.unwrap_or(crate::DEFAULT_UPDATE_INTERVAL_MS);
    if let Some(eligibility_ms) = display.eligibility_interval_ms
        && eligibility_ms < update_ms
    {
        errors.push(ValidationError::DisplayError(format!(
            "eligibility_interval_ms ({}) must not be shorter than update_interval_ms ({})",
            eligibility_ms, update_ms
        )));
    }

    if let Some(style) = &display.default_counter_style
        && let Err(e) = style.parse::<CounterStyle>()
    {
        errors.push(ValidationError::DisplayError(e.to_string()));
    }

    if let Some(emojis) = &display.default_celebration_emojis
        && emojis.is_empty()
    {
        errors.push(ValidationError::DisplayError(
            "default_celebration_emojis cannot be empty".into(),
        ));
    }

    errors
}

fn validate_event(event: &RawEvent) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if event.name.trim().is_empty() {
        errors.push(ValidationError::EventError {
            event: event.id.clone().unwrap_or_default(),
            message: "name cannot be empty".into(),
        });
    }

    if let Some(style) = &event.counter_style
        && let Err(e) = style.parse::<CounterStyle>()
    {
        errors.push(ValidationError::EventError {
            event: event.name.clone(),
            message: e.to_string(),
        });
    }

    let colors = [
        ("text_color", &event.text_color),
        ("accent_color", &event.accent_color),
        ("counter_text_color", &event.counter_text_color),
    ];
    for (field, value) in colors {
        if let Some(value) = value
            && value.parse::<HexColor>().is_err()
        {
            errors.push(ValidationError::InvalidColor {
                event: event.name.clone(),
                field,
                value: value.clone(),
            });
        }
    }

    if let Some(emojis) = &event.celebration_emojis
        && emojis.is_empty()
    {
        errors.push(ValidationError::EventError {
            event: event.name.clone(),
            message: "celebration_emojis cannot be empty".into(),
        });
    }

    if let Err(message) = parse_event_date(&event.date, event.time.as_deref()) {
        let value = match &event.time {
            Some(time) => format!("{} {}", event.date, time),
            None => event.date.clone(),
        };
        errors.push(ValidationError::InvalidDate {
            event: event.name.clone(),
            value,
            message,
        });
    }

    errors
}

/// Parse an `HH`, `HH:MM` or `HH:MM:SS` time. Missing parts are zero.
pub fn parse_clock_time(s: &str) -> Result<NaiveTime, String> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() > 3 {
        return Err("Expected HH:MM or HH:MM:SS format".into());
    }

    let field = |idx: usize, name: &str| -> Result<u32, String> {
        match parts.get(idx) {
            None => Ok(0),
            Some(p) => p.parse().map_err(|_| format!("Invalid {}", name)),
        }
    };

    let hour = field(0, "hour")?;
    let minute = field(1, "minute")?;
    let second = field(2, "second")?;

    NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| "Time out of range (expected 00:00:00 to 23:59:59)".to_string())
}

/// Resolve an event's date and optional time to a local instant.
///
/// - A `date` containing `T` is a complete timestamp: RFC 3339 (with offset)
///   or a naive `YYYY-MM-DDTHH:MM[:SS]` read as local time. `time` is ignored.
/// - Otherwise `date` is `YYYY-MM-DD` and `time`, if given, is the local time
///   of day. Without `time` the target is local midnight.
pub fn parse_event_date(date: &str, time: Option<&str>) -> Result<DateTime<Local>, String> {
    let date = date.trim();

    let naive = if date.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
            return Ok(dt.with_timezone(&Local));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(date, fmt).ok())
            .ok_or_else(|| "Expected YYYY-MM-DDTHH:MM[:SS]".to_string())?
    } else {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| "Expected YYYY-MM-DD".to_string())?;
        let time_of_day = match time {
            Some(t) => parse_clock_time(t)?,
            None => NaiveTime::MIN,
        };
        day.and_time(time_of_day)
    };

    resolve_local(naive).ok_or_else(|| "Time does not exist in the local time zone".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn raw_event(name: &str, date: &str) -> RawEvent {
        RawEvent {
            id: None,
            name: name.into(),
            date: date.into(),
            time: None,
            icon: None,
            counter_style: None,
            text_color: None,
            accent_color: None,
            counter_text_color: None,
            celebrate_on_day: true,
            celebration_emojis: None,
        }
    }

    fn raw_config(events: Vec<RawEvent>) -> RawConfig {
        RawConfig {
            config_version: 1,
            display: Default::default(),
            events,
        }
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(
            parse_clock_time("14:30").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
        assert_eq!(
            parse_clock_time("14:30:15").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 15).unwrap()
        );
        assert_eq!(
            parse_clock_time("9").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );

        assert!(parse_clock_time("24:00").is_err());
        assert!(parse_clock_time("12:60").is_err());
        assert!(parse_clock_time("12:00:00:00").is_err());
        assert!(parse_clock_time("noon").is_err());
    }

    #[test]
    fn test_parse_date_only_is_local_midnight() {
        let dt = parse_event_date("2025-01-01", None).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 1, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
    }

    #[test]
    fn test_parse_date_with_time() {
        let dt = parse_event_date("2025-07-04", Some("21:15")).unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (21, 15, 0));
    }

    #[test]
    fn test_parse_full_timestamp_ignores_time() {
        let dt = parse_event_date("2025-07-04T08:05:09", Some("21:15")).unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (8, 5, 9));

        let dt = parse_event_date("2025-07-04T08:05", None).unwrap();
        assert_eq!((dt.hour(), dt.minute()), (8, 5));
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_event_date("2025-01-01T00:00:00Z", None).unwrap();
        let utc = DateTime::parse_from_rfc3339("2025-01-01T00:00:00+00:00").unwrap();
        assert_eq!(dt, utc);
    }

    #[test]
    fn test_parse_invalid_dates() {
        assert!(parse_event_date("2025-13-01", None).is_err());
        assert!(parse_event_date("next tuesday", None).is_err());
        assert!(parse_event_date("2025-01-01", Some("25:00")).is_err());
        assert!(parse_event_date("2025-01-01Tnoon", None).is_err());
    }

    #[test]
    fn test_duplicate_event_detection() {
        let config = raw_config(vec![
            raw_event("Party", "2025-06-01"),
            raw_event("Party", "2025-06-01"),
        ]);

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateEvent(_))));
    }

    #[test]
    fn test_same_name_different_id_is_not_duplicate() {
        let mut first = raw_event("Party", "2025-06-01");
        first.id = Some("party-a".into());
        let mut second = raw_event("Party", "2025-06-01");
        second.id = Some("party-b".into());

        let errors = validate_config(&raw_config(vec![first, second]));
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_bad_date_is_not_fatal() {
        let errors = validate_config(&raw_config(vec![raw_event("Someday", "soon")]));
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::InvalidDate { .. }));
        assert!(!errors[0].is_fatal());
    }

    #[test]
    fn test_bad_style_and_color_are_fatal() {
        let mut event = raw_event("Launch", "2025-06-01");
        event.counter_style = Some("analog".into());
        event.accent_color = Some("gold".into());

        let errors = validate_config(&raw_config(vec![event]));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(ValidationError::is_fatal));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidColor { field: "accent_color", .. }
        )));
    }

    #[test]
    fn test_display_constraints() {
        let mut config = raw_config(vec![]);
        config.display.update_interval_ms = Some(1000);
        config.display.eligibility_interval_ms = Some(500);
        config.display.show_passed_events_for_hours = Some(-1.0);
        config.display.default_celebration_emojis = Some(vec![]);

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| matches!(e, ValidationError::DisplayError(_))));
    }
}
