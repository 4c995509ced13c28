//! Event lifecycle filter

use chrono::{DateTime, Local, TimeDelta};
use countdown_config::EventSpec;
use countdown_util::EventKey;
use std::time::Duration;
use tracing::debug;

/// An event together with its resolved target, as of one eligibility pass
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleEvent {
    pub spec: EventSpec,
    pub target: DateTime<Local>,
    /// More than the retention window has passed since the target
    pub expired: bool,
}

impl EligibleEvent {
    pub fn key(&self) -> EventKey {
        self.spec.key
    }
}

/// Resolve and mark every event, in configuration order.
///
/// Events without a resolved target are left out. Future targets are never
/// expired.
pub fn mark_expiry(
    specs: &[EventSpec],
    now: DateTime<Local>,
    retention: Duration,
) -> Vec<EligibleEvent> {
    let retention = TimeDelta::from_std(retention).unwrap_or(TimeDelta::MAX);

    specs
        .iter()
        .filter_map(|spec| {
            let target = spec.target?;
            Some(EligibleEvent {
                spec: spec.clone(),
                target,
                expired: now - target > retention,
            })
        })
        .collect()
}

/// Events still worth displaying at `now`, ascending by target.
///
/// The sort is stable, so events sharing a target keep their configuration
/// order. The result depends only on the arguments.
pub fn select_eligible(
    specs: &[EventSpec],
    now: DateTime<Local>,
    retention: Duration,
) -> Vec<EligibleEvent> {
    let mut eligible: Vec<_> = mark_expiry(specs, now, retention)
        .into_iter()
        .filter(|e| !e.expired)
        .collect();
    eligible.sort_by_key(|e| e.target);

    debug!(
        configured = specs.len(),
        eligible = eligible.len(),
        "Eligibility pass"
    );

    eligible
}
