//! Schedule handle abstraction

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static NEXT_SCHEDULE_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a periodic schedule
///
/// Cloning shares the cancellation flag: cancelling any clone stops the
/// schedule. The scheduler checks the flag before every tick, so a tick that
/// is already running finishes normally.
#[derive(Debug, Clone)]
pub struct ScheduleHandle {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl ScheduleHandle {
    pub fn new() -> Self {
        Self {
            id: NEXT_SCHEDULE_ID.fetch_add(1, Ordering::Relaxed),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for ScheduleHandle {
    fn default() -> Self {
        Self::new()
    }
}
