//! Wall clock backed by the host's local time

use chrono::{DateTime, Local};

use crate::Clock;

/// The host clock (honours `COUNTDOWN_MOCK_TIME` in debug builds)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        countdown_util::now()
    }
}
