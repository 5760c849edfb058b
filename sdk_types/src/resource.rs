//! Resource kinds and timer identity

use crate::limits::MAX_CALLBACKS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The categories of host resource that can produce events
///
/// The host tags every delivered event with one of these. The dispatch
/// core routes `Timer`, `Gpio`, and `Message`; `Sensor` exists in the
/// host ABI but is read synchronously and never dispatched, so the event
/// pump tolerates it without routing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Timer resource
    Timer,
    /// GPIO resource
    Gpio,
    /// Sensor resource (never dispatched)
    Sensor,
    /// Pub/sub message resource
    Message,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Timer => write!(f, "timer"),
            ResourceKind::Gpio => write!(f, "gpio"),
            ResourceKind::Sensor => write!(f, "sensor"),
            ResourceKind::Message => write!(f, "message"),
        }
    }
}

/// Identity of a guest timer
///
/// Timer ids are small dense integers assigned by the application. The
/// callback registry indexes its timer table directly by id, so only
/// ids below [`MAX_CALLBACKS`] can carry a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u32);

impl TimerId {
    /// Creates a timer id
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns whether this id can hold a callback registration
    pub fn in_callback_range(&self) -> bool {
        (self.0 as usize) < MAX_CALLBACKS
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_id_range() {
        assert!(TimerId::new(0).in_callback_range());
        assert!(TimerId::new(MAX_CALLBACKS as u32 - 1).in_callback_range());
        assert!(!TimerId::new(MAX_CALLBACKS as u32).in_callback_range());
    }

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(ResourceKind::Message.to_string(), "message");
        assert_eq!(ResourceKind::Timer.to_string(), "timer");
    }

    #[test]
    fn test_timer_id_round_trips_through_serde() {
        let id = TimerId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        let back: TimerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
