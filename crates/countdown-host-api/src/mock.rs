//! Mock host capabilities for testing

use chrono::{DateTime, Local};
use countdown_api::DisplayUpdate;
use countdown_util::EventKey;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use crate::{
    Clock, RenderDriver, RenderError, RenderResult, ScheduleError, ScheduleHandle,
    ScheduleResult, Scheduler, TickCallback,
};

/// Settable clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl MockClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, instant: DateTime<Local>) {
        *self.now.lock().unwrap() = instant;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}

struct ManualSchedule {
    handle: ScheduleHandle,
    interval: Duration,
    /// Time accumulated towards the next tick
    pending: Duration,
    callback: TickCallback,
}

/// Scheduler driven by the test: nothing runs until `fire` or `advance`
#[derive(Default)]
pub struct ManualScheduler {
    schedules: Vec<ManualSchedule>,

    /// Configure schedule to fail
    pub fail_schedule: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of schedules that have not been cancelled
    pub fn active(&self) -> usize {
        self.schedules
            .iter()
            .filter(|s| !s.handle.is_cancelled())
            .count()
    }

    /// Run every live schedule exactly once
    pub fn fire(&mut self) {
        self.schedules.retain(|s| !s.handle.is_cancelled());
        for schedule in &mut self.schedules {
            (schedule.callback)();
        }
    }

    /// Let `by` elapse, running each schedule once per whole interval.
    /// Returns how many callbacks ran.
    pub fn advance(&mut self, by: Duration) -> usize {
        let mut ran = 0;
        self.schedules.retain(|s| !s.handle.is_cancelled());

        for schedule in &mut self.schedules {
            schedule.pending += by;
            while schedule.pending >= schedule.interval {
                if schedule.handle.is_cancelled() {
                    break;
                }
                schedule.pending -= schedule.interval;
                (schedule.callback)();
                ran += 1;
            }
        }

        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(
        &mut self,
        interval: Duration,
        callback: TickCallback,
    ) -> ScheduleResult<ScheduleHandle> {
        if self.fail_schedule {
            return Err(ScheduleError::Unavailable("mock failure".into()));
        }
        if interval.is_zero() {
            return Err(ScheduleError::ZeroInterval);
        }

        let handle = ScheduleHandle::new();
        debug!(schedule_id = handle.id(), interval = ?interval, "Mock schedule created");
        self.schedules.push(ManualSchedule {
            handle: handle.clone(),
            interval,
            pending: Duration::ZERO,
            callback,
        });
        Ok(handle)
    }
}

/// Render driver that records every update it is given.
///
/// Clones share the recording, so a test can keep one clone while the other
/// is moved into a scheduled callback.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    updates: Arc<Mutex<Vec<DisplayUpdate>>>,
    ticks: Arc<Mutex<Vec<DateTime<Local>>>>,
    missing: Arc<Mutex<HashSet<EventKey>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates applied so far, in order
    pub fn updates(&self) -> Vec<DisplayUpdate> {
        self.updates.lock().unwrap().clone()
    }

    /// Instants passed to `end_tick`
    pub fn ticks(&self) -> Vec<DateTime<Local>> {
        self.ticks.lock().unwrap().clone()
    }

    /// Simulate the display having no element for `key`: updates for it
    /// fail with `MissingElement` and are not recorded
    pub fn simulate_missing(&self, key: EventKey) {
        self.missing.lock().unwrap().insert(key);
    }

    pub fn restore(&self, key: &EventKey) {
        self.missing.lock().unwrap().remove(key);
    }
}

impl RenderDriver for RecordingRenderer {
    fn apply(&mut self, update: &DisplayUpdate) -> RenderResult<()> {
        if let Some(key) = update.key()
            && self.missing.lock().unwrap().contains(&key)
        {
            return Err(RenderError::missing(key, "counter"));
        }

        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }

    fn end_tick(&mut self, now: DateTime<Local>) -> RenderResult<()> {
        self.ticks.lock().unwrap().push(now);
        Ok(())
    }
}
