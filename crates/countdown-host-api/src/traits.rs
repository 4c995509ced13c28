//! Host capability traits

use chrono::{DateTime, Local};
use countdown_api::DisplayUpdate;
use countdown_util::EventKey;
use std::time::Duration;
use thiserror::Error;

use crate::ScheduleHandle;

/// Errors from a render driver
#[derive(Debug, Error)]
pub enum RenderError {
    /// The update targets an element the driver does not currently display,
    /// e.g. because the display tree is only partially built
    #[error("Missing display element '{element}' for event {key}")]
    MissingElement { key: EventKey, element: String },

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn missing(key: EventKey, element: impl Into<String>) -> Self {
        Self::MissingElement {
            key,
            element: element.into(),
        }
    }

    /// Whether the tick can carry on past this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RenderError::MissingElement { .. })
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Errors from a scheduler
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Tick interval must be greater than zero")]
    ZeroInterval,

    #[error("Scheduler unavailable: {0}")]
    Unavailable(String),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Callback run on every tick
pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

/// Periodic re-invocation of the tick routine.
///
/// Implementations must run each callback to completion before invoking it
/// again; ticks of one schedule never overlap.
pub trait Scheduler {
    /// Invoke `callback` every `interval` until the returned handle is
    /// cancelled
    fn schedule(&mut self, interval: Duration, callback: TickCallback)
    -> ScheduleResult<ScheduleHandle>;
}

/// Applies display updates to some visual representation
pub trait RenderDriver {
    /// Called once before the updates of a tick, with the tick's instant
    fn begin_tick(&mut self, _now: DateTime<Local>) {}

    /// Apply one update
    fn apply(&mut self, update: &DisplayUpdate) -> RenderResult<()>;

    /// Called once after all updates of a tick have been applied
    fn end_tick(&mut self, _now: DateTime<Local>) -> RenderResult<()> {
        Ok(())
    }
}

impl<R: RenderDriver + ?Sized> RenderDriver for Box<R> {
    fn begin_tick(&mut self, now: DateTime<Local>) {
        (**self).begin_tick(now)
    }

    fn apply(&mut self, update: &DisplayUpdate) -> RenderResult<()> {
        (**self).apply(update)
    }

    fn end_tick(&mut self, now: DateTime<Local>) -> RenderResult<()> {
        (**self).end_tick(now)
    }
}
