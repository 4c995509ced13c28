//! Remaining-time calculator

use chrono::{DateTime, Local};
use countdown_api::TimeRemaining;

/// Time left from `now` until `target`, truncated to whole milliseconds.
///
/// A target at or before `now` (including anything less than a millisecond
/// away) is arrived and every field is zero.
pub fn compute_remaining(target: DateTime<Local>, now: DateTime<Local>) -> TimeRemaining {
    TimeRemaining::from_millis((target - now).num_milliseconds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn new_year_example() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let now = at(2024, 12, 30, 12, 30, 15);

        let remaining = compute_remaining(target, now);
        assert_eq!(remaining.days, 1);
        assert_eq!(remaining.hours, 11);
        assert_eq!(remaining.minutes, 29);
        assert_eq!(remaining.seconds, 45);
        assert!(!remaining.arrived);
    }

    #[test]
    fn arrival_is_inclusive() {
        let target = at(2025, 1, 1, 0, 0, 0);
        assert_eq!(compute_remaining(target, target), TimeRemaining::ARRIVED);
        assert_eq!(
            compute_remaining(target, target + Duration::seconds(1)),
            TimeRemaining::ARRIVED
        );
    }

    #[test]
    fn partial_seconds_truncate() {
        let now = at(2025, 3, 1, 12, 0, 0);
        let target = now + Duration::milliseconds(1999);

        let remaining = compute_remaining(target, now);
        assert_eq!(remaining.total_ms, 1999);
        assert_eq!(remaining.seconds, 1);
        assert!(!remaining.arrived);
    }

    #[test]
    fn days_are_not_normalized() {
        let now = at(2025, 3, 1, 12, 0, 0);
        let target = now + Duration::days(400) + Duration::hours(23);

        let remaining = compute_remaining(target, now);
        assert_eq!(remaining.days, 400);
        assert_eq!(remaining.hours, 23);
    }
}
