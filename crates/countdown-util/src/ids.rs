//! Strongly-typed identifiers for countdown events

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Namespace for name-based event keys. Changing it re-keys every event.
const EVENT_KEY_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6d, 0x2f, 0x41, 0x0c, 0x93, 0x1e, 0x4b, 0x57, 0x8a, 0x05, 0xc1, 0x7e, 0x2b, 0x64, 0xd9, 0x13,
]);

/// Stable identity of a configured event.
///
/// Derived from the event's explicit `id` when one is configured, otherwise
/// from its name and raw date/time strings. The same configuration always
/// yields the same key, so latched state survives reordering of the event
/// list and config reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventKey(Uuid);

impl EventKey {
    /// Key for an event with an explicit configured id
    pub fn from_id(id: &str) -> Self {
        Self(Uuid::new_v5(&EVENT_KEY_NAMESPACE, format!("id:{id}").as_bytes()))
    }

    /// Key for an event identified by its name and target
    pub fn from_name_and_target(name: &str, date: &str, time: Option<&str>) -> Self {
        let material = format!("event:{}\u{1f}{}\u{1f}{}", name, date, time.unwrap_or(""));
        Self(Uuid::new_v5(&EVENT_KEY_NAMESPACE, material.as_bytes()))
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable_for_same_input() {
        let k1 = EventKey::from_name_and_target("New Year", "2025-01-01", None);
        let k2 = EventKey::from_name_and_target("New Year", "2025-01-01", None);
        assert_eq!(k1, k2);
    }

    #[test]
    fn key_depends_on_target() {
        let k1 = EventKey::from_name_and_target("Party", "2025-06-01", Some("18:00"));
        let k2 = EventKey::from_name_and_target("Party", "2025-06-01", Some("19:00"));
        let k3 = EventKey::from_name_and_target("Party", "2025-06-01", None);
        assert_ne!(k1, k2);
        assert_ne!(k1, k3);
    }

    #[test]
    fn explicit_id_does_not_collide_with_name() {
        let by_id = EventKey::from_id("party");
        let by_name = EventKey::from_name_and_target("party", "", None);
        assert_ne!(by_id, by_name);
        assert_eq!(by_id, EventKey::from_id("party"));
    }

    #[test]
    fn key_serializes_as_uuid_string() {
        let key = EventKey::from_id("birthday");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key));
        let parsed: EventKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, parsed);
    }
}
