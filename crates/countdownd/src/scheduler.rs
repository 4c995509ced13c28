//! Tokio-backed tick scheduler

use countdown_host_api::{ScheduleError, ScheduleHandle, ScheduleResult, Scheduler, TickCallback};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Runs each schedule as a task on the current tokio runtime.
///
/// A schedule's callback runs inside its own task, so one tick always
/// finishes before the next starts. Ticks missed while a callback was slow
/// are skipped rather than replayed.
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Scheduler bound to the runtime this is called from
    pub fn current() -> ScheduleResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| ScheduleError::Unavailable(e.to_string()))?;
        Ok(Self { runtime })
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(
        &mut self,
        interval: Duration,
        mut callback: TickCallback,
    ) -> ScheduleResult<ScheduleHandle> {
        if interval.is_zero() {
            return Err(ScheduleError::ZeroInterval);
        }

        let handle = ScheduleHandle::new();
        let task_handle = handle.clone();

        self.runtime.spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                timer.tick().await;
                if task_handle.is_cancelled() {
                    debug!(schedule_id = task_handle.id(), "Schedule cancelled");
                    break;
                }
                callback();
            }
        });

        debug!(schedule_id = handle.id(), interval = ?interval, "Tick schedule started");
        Ok(handle)
    }
}
