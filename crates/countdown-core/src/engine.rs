//! Countdown tick engine

use chrono::{DateTime, Local, TimeDelta};
use countdown_api::{DisplayUpdate, EventView};
use countdown_config::CountdownConfig;
use countdown_host_api::{Clock, RenderDriver};
use countdown_util::EventKey;
use tracing::{debug, info, warn};

use crate::{ArrivalTracker, ArrivalTransition, EligibleEvent, compute_remaining, select_eligible};

/// What happened while applying one tick to a render driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Updates the driver accepted
    pub applied: usize,
    /// Updates the driver could not apply
    pub skipped: usize,
}

/// The countdown engine.
///
/// Owns the eligible-event list and the arrival latches. Each call to
/// [`CountdownEngine::tick`] runs to completion and returns the updates the
/// render layer has to apply for that instant.
pub struct CountdownEngine {
    config: CountdownConfig,
    eligible: Vec<EligibleEvent>,
    arrivals: ArrivalTracker,
    /// Keys of the displayed set, in display order. None until the first
    /// rebuild, and after a reload.
    displayed: Option<Vec<EventKey>>,
    last_pass: Option<DateTime<Local>>,
}

impl CountdownEngine {
    pub fn new(config: CountdownConfig) -> Self {
        info!(
            event_count = config.events.len(),
            update_interval_ms = config.display.update_interval.as_millis() as u64,
            "Countdown engine initialized"
        );
        log_unresolved(&config);

        Self {
            config,
            eligible: Vec::new(),
            arrivals: ArrivalTracker::new(),
            displayed: None,
            last_pass: None,
        }
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    /// Events currently displayed, ascending by target
    pub fn eligible(&self) -> &[EligibleEvent] {
        &self.eligible
    }

    pub fn is_arrived(&self, key: &EventKey) -> bool {
        self.arrivals.is_arrived(key)
    }

    /// Replace the configuration.
    ///
    /// The next tick re-runs the eligibility pass and rebuilds the display.
    /// Latches of events that are still displayed afterwards are kept.
    pub fn reload(&mut self, config: CountdownConfig) {
        info!(event_count = config.events.len(), "Configuration reloaded");
        log_unresolved(&config);

        self.config = config;
        self.displayed = None;
        self.last_pass = None;
    }

    /// Compute the updates for `now`.
    ///
    /// A `Rebuild` or `NothingScheduled` comes first when the displayed set
    /// changed, followed by one `Refresh` per pending event and one `Arrived`
    /// for each event that reached its target on this tick. Arrived events
    /// get nothing further.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<DisplayUpdate> {
        let mut updates = Vec::new();

        if self.pass_due(now)
            && let Some(update) = self.run_eligibility_pass(now)
        {
            updates.push(update);
        }

        for event in &self.eligible {
            let key = event.key();
            let remaining = compute_remaining(event.target, now);

            match self.arrivals.observe(key, event.target, remaining.arrived) {
                ArrivalTransition::Pending => {
                    updates.push(DisplayUpdate::Refresh { key, remaining });
                }
                ArrivalTransition::JustArrived => {
                    info!(event = %event.spec.name, key = %key, "Event arrived");
                    updates.push(DisplayUpdate::Arrived {
                        key,
                        celebration: self.config.display.celebration_for(&event.spec),
                    });
                }
                ArrivalTransition::AlreadyArrived => {}
            }
        }

        updates
    }

    /// Tick at the clock's current instant and hand the updates to `driver`.
    ///
    /// A driver failure only skips the update it failed on.
    pub fn run_tick(&mut self, clock: &dyn Clock, driver: &mut dyn RenderDriver) -> TickReport {
        let now = clock.now();
        let mut report = TickReport::default();

        driver.begin_tick(now);
        for update in self.tick(now) {
            match driver.apply(&update) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    warn!(
                        error = %e,
                        recoverable = e.is_recoverable(),
                        "Skipping display update"
                    );
                    report.skipped += 1;
                }
            }
        }

        if let Err(e) = driver.end_tick(now) {
            warn!(error = %e, "Render driver failed to finish tick");
        }

        report
    }

    fn pass_due(&self, now: DateTime<Local>) -> bool {
        let Some(last) = self.last_pass else {
            return true;
        };
        let interval =
            TimeDelta::from_std(self.config.display.eligibility_interval).unwrap_or(TimeDelta::MAX);
        // A clock that went backwards also triggers a pass
        now < last || now - last >= interval
    }

    /// Replace the eligible list. Returns the rebuild notice when the
    /// displayed set changed.
    fn run_eligibility_pass(&mut self, now: DateTime<Local>) -> Option<DisplayUpdate> {
        self.last_pass = Some(now);
        self.eligible = select_eligible(
            &self.config.events,
            now,
            self.config.display.retention_window,
        );

        let keys: Vec<EventKey> = self.eligible.iter().map(EligibleEvent::key).collect();
        if self.displayed.as_ref() == Some(&keys) {
            return None;
        }

        debug!(
            previous = self.displayed.as_ref().map(Vec::len),
            current = keys.len(),
            "Displayed set changed"
        );
        self.arrivals.retain(&keys);
        self.displayed = Some(keys);

        if self.eligible.is_empty() {
            return Some(DisplayUpdate::NothingScheduled);
        }

        let events = self
            .eligible
            .iter()
            .map(|event| {
                let remaining = compute_remaining(event.target, now);
                EventView {
                    key: event.key(),
                    name: event.spec.name.clone(),
                    icon: event.spec.icon.clone(),
                    target: event.target,
                    style: event.spec.style,
                    colors: event.spec.colors,
                    remaining,
                    arrived: remaining.arrived,
                    celebration: self.config.display.celebration_for(&event.spec),
                }
            })
            .collect();

        Some(DisplayUpdate::Rebuild { events })
    }
}

fn log_unresolved(config: &CountdownConfig) {
    for event in config.events.iter().filter(|e| e.target.is_none()) {
        warn!(
            event = %event.name,
            date = %event.date,
            time = ?event.time,
            "Event target could not be resolved; it will not be displayed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use countdown_config::{DisplaySettings, EventSpec};
    use countdown_host_api::{MockClock, RecordingRenderer, RenderError, RenderResult};
    use std::time::Duration;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn make_config(events: Vec<EventSpec>) -> CountdownConfig {
        CountdownConfig {
            display: DisplaySettings::default(),
            events,
            warnings: vec![],
        }
    }

    #[test]
    fn first_tick_rebuilds_then_refreshes() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let mut engine =
            CountdownEngine::new(make_config(vec![EventSpec::new("New Year", target)]));

        let updates = engine.tick(at(2024, 12, 30, 12, 30, 15));
        assert_eq!(updates.len(), 2);
        let DisplayUpdate::Rebuild { events } = &updates[0] else {
            panic!("expected rebuild, got {:?}", updates[0]);
        };
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "New Year");
        assert!(!events[0].arrived);

        let DisplayUpdate::Refresh { remaining, .. } = &updates[1] else {
            panic!("expected refresh, got {:?}", updates[1]);
        };
        assert_eq!(
            (remaining.days, remaining.hours, remaining.minutes, remaining.seconds),
            (1, 11, 29, 45)
        );

        // Same set on the next tick: refresh only
        let updates = engine.tick(at(2024, 12, 30, 12, 30, 16));
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0], DisplayUpdate::Refresh { .. }));
    }

    #[test]
    fn empty_set_reports_nothing_scheduled_once() {
        let mut engine = CountdownEngine::new(make_config(vec![]));
        let now = at(2025, 1, 1, 0, 0, 0);

        assert_eq!(engine.tick(now), vec![DisplayUpdate::NothingScheduled]);
        assert!(engine.tick(now + TimeDelta::seconds(1)).is_empty());
    }

    #[test]
    fn arrival_notice_fires_once_then_freezes() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let spec = EventSpec::new("New Year", target);
        let key = spec.key;
        let mut engine = CountdownEngine::new(make_config(vec![spec]));

        engine.tick(target - TimeDelta::seconds(1));
        let updates = engine.tick(target);
        assert_eq!(updates.len(), 1);
        let DisplayUpdate::Arrived { key: arrived, celebration } = &updates[0] else {
            panic!("expected arrival, got {:?}", updates[0]);
        };
        assert_eq!(*arrived, key);
        assert_eq!(celebration.as_ref().map(|c| c.particle_count), Some(30));

        for s in 1..5 {
            assert!(engine.tick(target + TimeDelta::seconds(s)).is_empty());
        }
        assert!(engine.is_arrived(&key));
    }

    #[test]
    fn celebration_can_be_disabled() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let spec = EventSpec::new("Quiet", target).with_celebration(false);
        let mut engine = CountdownEngine::new(make_config(vec![spec]));

        let updates = engine.tick(target + TimeDelta::seconds(1));
        let DisplayUpdate::Rebuild { events } = &updates[0] else {
            panic!("expected rebuild");
        };
        assert!(events[0].arrived);
        assert!(events[0].celebration.is_none());
        assert!(matches!(updates[1], DisplayUpdate::Arrived { celebration: None, .. }));
    }

    #[test]
    fn expiry_removes_event_and_rebuilds() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let mut engine =
            CountdownEngine::new(make_config(vec![EventSpec::new("New Year", target)]));

        let updates = engine.tick(at(2025, 1, 1, 0, 0, 1));
        assert!(matches!(updates[0], DisplayUpdate::Rebuild { .. }));
        assert!(matches!(updates[1], DisplayUpdate::Arrived { .. }));

        let updates = engine.tick(at(2025, 1, 2, 0, 0, 1));
        assert_eq!(updates, vec![DisplayUpdate::NothingScheduled]);
        assert!(engine.eligible().is_empty());
    }

    #[test]
    fn eligibility_runs_at_its_own_cadence() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let mut config = make_config(vec![EventSpec::new("New Year", target)]);
        config.display.retention_window = Duration::from_secs(10);
        config.display.eligibility_interval = Duration::from_secs(60);
        let mut engine = CountdownEngine::new(config);

        let start = target + TimeDelta::seconds(5);
        assert_eq!(engine.tick(start).len(), 2);

        // Expired, but the next pass is not due yet
        assert!(engine.tick(start + TimeDelta::seconds(30)).is_empty());
        assert_eq!(engine.eligible().len(), 1);

        let updates = engine.tick(start + TimeDelta::seconds(60));
        assert_eq!(updates, vec![DisplayUpdate::NothingScheduled]);
    }

    #[test]
    fn reload_keeps_latches_of_surviving_events() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let kept = EventSpec::new("Kept", target);
        let kept_key = kept.key;
        let mut engine = CountdownEngine::new(make_config(vec![kept.clone()]));
        engine.tick(target + TimeDelta::seconds(1));
        assert!(engine.is_arrived(&kept_key));

        let added = EventSpec::new("Added", target + TimeDelta::days(7));
        engine.reload(make_config(vec![added, kept]));

        let updates = engine.tick(target + TimeDelta::seconds(2));
        let DisplayUpdate::Rebuild { events } = &updates[0] else {
            panic!("expected rebuild");
        };
        let names: Vec<_> = events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Kept", "Added"]);
        // No second arrival for the kept event
        assert_eq!(updates.len(), 2);
        assert!(matches!(updates[1], DisplayUpdate::Refresh { .. }));
    }

    #[test]
    fn reload_with_moved_target_resumes_countdown() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let mut spec = EventSpec::new("Launch", target);
        spec.key = EventKey::from_id("launch");
        let key = spec.key;
        let mut engine = CountdownEngine::new(make_config(vec![spec]));
        engine.tick(target + TimeDelta::seconds(1));
        assert!(engine.is_arrived(&key));

        // Explicit id: the key survives the date edit
        let mut moved = EventSpec::new("Launch", at(2025, 2, 1, 0, 0, 0));
        moved.key = key;
        engine.reload(make_config(vec![moved]));

        let updates = engine.tick(target + TimeDelta::seconds(2));
        assert_eq!(updates.len(), 2);
        let DisplayUpdate::Rebuild { events } = &updates[0] else {
            panic!("expected rebuild");
        };
        assert!(!events[0].arrived);
        assert!(matches!(updates[1], DisplayUpdate::Refresh { .. }));
        assert!(!engine.is_arrived(&key));

        for s in 3..5 {
            let updates = engine.tick(target + TimeDelta::seconds(s));
            assert_eq!(updates.len(), 1);
            assert!(matches!(updates[0], DisplayUpdate::Refresh { key: k, .. } if k == key));
        }
    }

    #[test]
    fn run_tick_skips_missing_elements() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let a = EventSpec::new("A", target);
        let b = EventSpec::new("B", target + TimeDelta::days(1));
        let missing = a.key;
        let mut engine = CountdownEngine::new(make_config(vec![a, b]));

        let clock = MockClock::new(target - TimeDelta::hours(1));
        let mut renderer = RecordingRenderer::new();
        renderer.simulate_missing(missing);

        let report = engine.run_tick(&clock, &mut renderer);
        assert_eq!(report, TickReport { applied: 2, skipped: 1 });
        assert_eq!(renderer.updates().len(), 2);
        assert_eq!(renderer.ticks(), vec![clock.now()]);
    }

    /// Driver whose encoder is broken for every update
    struct BrokenEncoder {
        attempts: usize,
    }

    impl RenderDriver for BrokenEncoder {
        fn apply(&mut self, _update: &DisplayUpdate) -> RenderResult<()> {
            self.attempts += 1;
            Err(RenderError::Encode("broken".into()))
        }
    }

    #[test]
    fn run_tick_skips_unrecoverable_failures_too() {
        let target = at(2025, 1, 1, 0, 0, 0);
        let a = EventSpec::new("A", target);
        let b = EventSpec::new("B", target + TimeDelta::days(1));
        let mut engine = CountdownEngine::new(make_config(vec![a, b]));

        let clock = MockClock::new(target - TimeDelta::hours(1));
        let mut driver = BrokenEncoder { attempts: 0 };

        let report = engine.run_tick(&clock, &mut driver);
        // Every update is still attempted
        assert_eq!(driver.attempts, 3);
        assert_eq!(report, TickReport { applied: 0, skipped: 3 });
    }
}
