//! Per-event arrival latches

use chrono::{DateTime, Local};
use countdown_util::EventKey;
use std::collections::HashMap;

/// What the tracker made of one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalTransition {
    /// Not arrived yet
    Pending,
    /// Arrived on this observation; the latch was just set
    JustArrived,
    /// Latched on an earlier observation
    AlreadyArrived,
}

/// One-way `Pending -> Arrived` latches keyed by event.
///
/// Each latch remembers the target it fired for. A latch is cleared when its
/// event leaves the displayed set (see [`ArrivalTracker::retain`]) or when the
/// event is observed with a different target.
#[derive(Debug, Default)]
pub struct ArrivalTracker {
    arrived: HashMap<EventKey, DateTime<Local>>,
}

impl ArrivalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record whether `key`, counting down to `target`, has arrived as of
    /// this tick
    pub fn observe(
        &mut self,
        key: EventKey,
        target: DateTime<Local>,
        arrived: bool,
    ) -> ArrivalTransition {
        match self.arrived.get(&key) {
            Some(latched) if *latched == target => return ArrivalTransition::AlreadyArrived,
            // Target was edited; the old latch no longer applies
            Some(_) => {
                self.arrived.remove(&key);
            }
            None => {}
        }

        if arrived {
            self.arrived.insert(key, target);
            ArrivalTransition::JustArrived
        } else {
            ArrivalTransition::Pending
        }
    }

    pub fn is_arrived(&self, key: &EventKey) -> bool {
        self.arrived.contains_key(key)
    }

    /// Drop latches of events no longer displayed
    pub fn retain(&mut self, displayed: &[EventKey]) {
        self.arrived.retain(|key, _| displayed.contains(key));
    }

    pub fn len(&self) -> usize {
        self.arrived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrived.is_empty()
    }
}
