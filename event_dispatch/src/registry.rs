//! Fixed-capacity callback tables
//!
//! One table per routable resource kind, each with
//! [`MAX_CALLBACKS`] slots. A resource identity maps to at most one
//! live callback; a slot is live iff it is `Some`. Registration reuses
//! the slot of an identical identity, otherwise takes the first empty
//! slot, and fails with `NoMemory` when neither exists. A failed
//! registration never leaves a half-initialized slot.

use crate::topic::topic_matches;
use sdk_types::limits::{MAX_CALLBACKS, MAX_TOPIC_LEN};
use sdk_types::{GpioPin, GpioPort, SdkError, SdkResult, TimerId};

/// Callback invoked when a registered timer fires
pub type TimerCallback = Box<dyn FnMut()>;

/// Callback invoked when a registered GPIO pin changes level
pub type GpioCallback = Box<dyn FnMut()>;

/// Callback invoked with the guest-local copies of a message's topic,
/// content type, and payload
///
/// The borrowed views are valid only for the synchronous duration of
/// the call; callbacks must copy anything they keep.
pub type MessageCallback = Box<dyn FnMut(&str, &str, &[u8])>;

struct GpioEntry {
    port: GpioPort,
    pin: GpioPin,
    callback: GpioCallback,
}

struct MessageEntry {
    topic: String,
    callback: MessageCallback,
}

/// The three callback tables of the dispatch core
///
/// Owned by the [`SdkContext`]; there is no process-wide registry. All
/// operations are synchronous and non-blocking, safe only under the
/// SDK's single-threaded cooperative model.
///
/// [`SdkContext`]: crate::SdkContext
pub struct CallbackRegistry {
    timers: Vec<Option<TimerCallback>>,
    gpio: Vec<Option<GpioEntry>>,
    messages: Vec<Option<MessageEntry>>,
}

impl CallbackRegistry {
    /// Creates an empty registry with [`MAX_CALLBACKS`] slots per table
    pub fn new() -> Self {
        Self {
            timers: (0..MAX_CALLBACKS).map(|_| None).collect(),
            gpio: (0..MAX_CALLBACKS).map(|_| None).collect(),
            messages: (0..MAX_CALLBACKS).map(|_| None).collect(),
        }
    }

    /// Installs a timer callback at the slot indexed by `id`
    ///
    /// Fails with `Invalid` if the id is outside the callback range.
    /// Re-registering the same id overwrites the previous callback.
    pub fn register_timer(&mut self, id: TimerId, callback: TimerCallback) -> SdkResult<()> {
        if !id.in_callback_range() {
            return Err(SdkError::Invalid);
        }
        self.timers[id.as_u32() as usize] = Some(callback);
        Ok(())
    }

    /// Installs a GPIO callback for a `(port, pin)` pair
    ///
    /// Reuses the slot of an existing registration for the same pair,
    /// otherwise the first empty slot. Fails with `Invalid` for an
    /// out-of-range port or pin, `NoMemory` when the table is full.
    pub fn register_gpio(
        &mut self,
        port: GpioPort,
        pin: GpioPin,
        callback: GpioCallback,
    ) -> SdkResult<()> {
        if !port.is_valid() || !pin.is_valid() {
            return Err(SdkError::Invalid);
        }
        let mut slot = None;
        for (index, entry) in self.gpio.iter().enumerate() {
            match entry {
                Some(live) if live.port == port && live.pin == pin => {
                    slot = Some(index);
                    break;
                }
                None if slot.is_none() => slot = Some(index),
                _ => {}
            }
        }
        let slot = slot.ok_or(SdkError::NoMemory)?;
        self.gpio[slot] = Some(GpioEntry { port, pin, callback });
        Ok(())
    }

    /// Installs a message callback for a topic
    ///
    /// Reuses the slot of an existing registration for the exact same
    /// topic, otherwise the first empty slot. Fails with `Invalid` for
    /// an empty topic, `NoMemory` when the table is full. The stored
    /// topic is truncated to `MAX_TOPIC_LEN - 1` bytes.
    pub fn register_message(&mut self, topic: &str, callback: MessageCallback) -> SdkResult<()> {
        if topic.is_empty() {
            return Err(SdkError::Invalid);
        }
        let mut slot = None;
        for (index, entry) in self.messages.iter().enumerate() {
            match entry {
                Some(live) if live.topic == topic => {
                    slot = Some(index);
                    break;
                }
                None if slot.is_none() => slot = Some(index),
                _ => {}
            }
        }
        let slot = slot.ok_or(SdkError::NoMemory)?;
        self.messages[slot] = Some(MessageEntry {
            topic: bounded_topic(topic),
            callback,
        });
        Ok(())
    }

    /// Clears the timer slot for `id`
    ///
    /// Fails with `Invalid` for an out-of-range id, `NotFound` when no
    /// callback is installed there.
    pub fn unregister_timer(&mut self, id: TimerId) -> SdkResult<()> {
        if !id.in_callback_range() {
            return Err(SdkError::Invalid);
        }
        let slot = &mut self.timers[id.as_u32() as usize];
        if slot.is_none() {
            return Err(SdkError::NotFound);
        }
        *slot = None;
        Ok(())
    }

    /// Clears the GPIO slot for a `(port, pin)` pair
    pub fn unregister_gpio(&mut self, port: GpioPort, pin: GpioPin) -> SdkResult<()> {
        let slot = self
            .gpio
            .iter_mut()
            .find(|entry| matches!(entry, Some(live) if live.port == port && live.pin == pin))
            .ok_or(SdkError::NotFound)?;
        *slot = None;
        Ok(())
    }

    /// Clears the message slot registered for exactly `topic`
    pub fn unregister_message(&mut self, topic: &str) -> SdkResult<()> {
        if topic.is_empty() {
            return Err(SdkError::Invalid);
        }
        let slot = self
            .messages
            .iter_mut()
            .find(|entry| matches!(entry, Some(live) if live.topic == topic))
            .ok_or(SdkError::NotFound)?;
        *slot = None;
        Ok(())
    }

    /// Looks up the timer callback for `id` (event pump only)
    pub(crate) fn timer_callback(&mut self, id: TimerId) -> Option<&mut TimerCallback> {
        if !id.in_callback_range() {
            return None;
        }
        self.timers[id.as_u32() as usize].as_mut()
    }

    /// Looks up the GPIO callback for an exact `(port, pin)` pair
    /// (event pump only)
    pub(crate) fn gpio_callback(
        &mut self,
        port: GpioPort,
        pin: GpioPin,
    ) -> Option<&mut GpioCallback> {
        self.gpio.iter_mut().find_map(|entry| match entry {
            Some(live) if live.port == port && live.pin == pin => Some(&mut live.callback),
            _ => None,
        })
    }

    /// Looks up the first message callback whose registered topic is a
    /// prefix of `topic`, in slot order (event pump only)
    pub(crate) fn message_callback(&mut self, topic: &str) -> Option<&mut MessageCallback> {
        self.messages.iter_mut().find_map(|entry| match entry {
            Some(live) if topic_matches(&live.topic, topic) => Some(&mut live.callback),
            _ => None,
        })
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncates a topic to `MAX_TOPIC_LEN - 1` bytes, backing off to the
/// nearest character boundary so the stored topic stays valid UTF-8.
fn bounded_topic(topic: &str) -> String {
    let max = MAX_TOPIC_LEN - 1;
    if topic.len() <= max {
        return topic.to_string();
    }
    let mut end = max;
    while !topic.is_char_boundary(end) {
        end -= 1;
    }
    topic[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn counter() -> (Rc<RefCell<u32>>, TimerCallback) {
        let count = Rc::new(RefCell::new(0));
        let inner = count.clone();
        (count, Box::new(move || *inner.borrow_mut() += 1))
    }

    #[test]
    fn test_timer_register_and_invoke() {
        let mut registry = CallbackRegistry::new();
        let (count, callback) = counter();
        registry.register_timer(TimerId::new(3), callback).unwrap();

        registry.timer_callback(TimerId::new(3)).unwrap()();
        assert_eq!(*count.borrow(), 1);
        assert!(registry.timer_callback(TimerId::new(4)).is_none());
    }

    #[test]
    fn test_timer_id_out_of_range() {
        let mut registry = CallbackRegistry::new();
        let (_, callback) = counter();
        assert_eq!(
            registry.register_timer(TimerId::new(MAX_CALLBACKS as u32), callback),
            Err(SdkError::Invalid)
        );
    }

    #[test]
    fn test_timer_reregistration_overwrites() {
        let mut registry = CallbackRegistry::new();
        let (first, cb1) = counter();
        let (second, cb2) = counter();
        registry.register_timer(TimerId::new(1), cb1).unwrap();
        registry.register_timer(TimerId::new(1), cb2).unwrap();

        registry.timer_callback(TimerId::new(1)).unwrap()();
        assert_eq!(*first.borrow(), 0);
        assert_eq!(*second.borrow(), 1);
    }

    #[test]
    fn test_timer_unregister() {
        let mut registry = CallbackRegistry::new();
        let (_, callback) = counter();
        registry.register_timer(TimerId::new(0), callback).unwrap();
        registry.unregister_timer(TimerId::new(0)).unwrap();
        assert!(registry.timer_callback(TimerId::new(0)).is_none());
        assert_eq!(
            registry.unregister_timer(TimerId::new(0)),
            Err(SdkError::NotFound)
        );
    }

    #[test]
    fn test_gpio_slot_reuse_on_same_pair() {
        let mut registry = CallbackRegistry::new();
        let (first, cb1) = counter();
        let (second, cb2) = counter();
        let port = GpioPort::new(1);
        let pin = GpioPin::new(5);
        registry.register_gpio(port, pin, cb1).unwrap();
        registry.register_gpio(port, pin, cb2).unwrap();

        registry.gpio_callback(port, pin).unwrap()();
        assert_eq!(*first.borrow(), 0);
        assert_eq!(*second.borrow(), 1);
    }

    #[test]
    fn test_gpio_invalid_pin_and_port() {
        let mut registry = CallbackRegistry::new();
        let (_, cb) = counter();
        assert_eq!(
            registry.register_gpio(GpioPort::new(99), GpioPin::new(0), cb),
            Err(SdkError::Invalid)
        );
        let (_, cb) = counter();
        assert_eq!(
            registry.register_gpio(GpioPort::new(0), GpioPin::new(99), cb),
            Err(SdkError::Invalid)
        );
    }

    #[test]
    fn test_gpio_capacity_exhaustion() {
        let mut registry = CallbackRegistry::new();
        for i in 0..MAX_CALLBACKS as u32 {
            let (_, cb) = counter();
            let port = GpioPort::new(i / 16);
            let pin = GpioPin::new(i % 16);
            registry.register_gpio(port, pin, cb).unwrap();
        }
        let (_, cb) = counter();
        assert_eq!(
            registry.register_gpio(GpioPort::new(4), GpioPin::new(0), cb),
            Err(SdkError::NoMemory)
        );
        // Prior registrations survive the failed one.
        assert!(registry
            .gpio_callback(GpioPort::new(0), GpioPin::new(0))
            .is_some());
        assert!(registry
            .gpio_callback(GpioPort::new(3), GpioPin::new(15))
            .is_some());
    }

    #[test]
    fn test_gpio_unregister_frees_slot() {
        let mut registry = CallbackRegistry::new();
        for i in 0..MAX_CALLBACKS as u32 {
            let (_, cb) = counter();
            registry
                .register_gpio(GpioPort::new(i / 16), GpioPin::new(i % 16), cb)
                .unwrap();
        }
        registry
            .unregister_gpio(GpioPort::new(0), GpioPin::new(0))
            .unwrap();
        let (_, cb) = counter();
        registry
            .register_gpio(GpioPort::new(4), GpioPin::new(0), cb)
            .unwrap();
    }

    #[test]
    fn test_message_empty_topic_invalid() {
        let mut registry = CallbackRegistry::new();
        assert_eq!(
            registry.register_message("", Box::new(|_, _, _| {})),
            Err(SdkError::Invalid)
        );
        assert_eq!(registry.unregister_message(""), Err(SdkError::Invalid));
    }

    #[test]
    fn test_message_capacity_exhaustion() {
        let mut registry = CallbackRegistry::new();
        for i in 0..MAX_CALLBACKS {
            registry
                .register_message(&format!("topic/{i}"), Box::new(|_, _, _| {}))
                .unwrap();
        }
        assert_eq!(
            registry.register_message("one-too-many", Box::new(|_, _, _| {})),
            Err(SdkError::NoMemory)
        );
        // Every prior topic still resolves.
        assert!(registry.message_callback("topic/0").is_some());
        assert!(registry.message_callback("topic/63").is_some());
    }

    #[test]
    fn test_message_first_match_wins() {
        let mut registry = CallbackRegistry::new();
        let hits = Rc::new(RefCell::new(Vec::new()));
        for name in ["a", "a/b"] {
            let hits = hits.clone();
            registry
                .register_message(
                    name,
                    Box::new(move |topic, _, _| hits.borrow_mut().push(topic.to_string())),
                )
                .unwrap();
        }
        // "a" was registered first and is a prefix of "a/b": it wins,
        // and only one callback fires.
        let callback = registry.message_callback("a/b").unwrap();
        callback("a/b", "", b"");
        assert_eq!(hits.borrow().as_slice(), ["a/b"]);
    }

    #[test]
    fn test_message_topic_truncated_to_bound() {
        let mut registry = CallbackRegistry::new();
        let long = "x".repeat(MAX_TOPIC_LEN + 40);
        registry
            .register_message(&long, Box::new(|_, _, _| {}))
            .unwrap();
        // The stored (truncated) topic still prefix-matches incoming
        // topics that carry the full string.
        assert!(registry.message_callback(&long).is_some());
        // But a shorter incoming topic does not reach the stored prefix.
        assert!(registry
            .message_callback(&"x".repeat(MAX_TOPIC_LEN - 2))
            .is_none());
    }

    #[test]
    fn test_message_unregister_then_lookup() {
        let mut registry = CallbackRegistry::new();
        registry
            .register_message("demo/x", Box::new(|_, _, _| {}))
            .unwrap();
        registry.unregister_message("demo/x").unwrap();
        assert!(registry.message_callback("demo/x").is_none());
        assert_eq!(
            registry.unregister_message("demo/x"),
            Err(SdkError::NotFound)
        );
    }

    #[test]
    fn test_bounded_topic_respects_char_boundary() {
        let topic = "é".repeat(MAX_TOPIC_LEN);
        let bounded = bounded_topic(&topic);
        assert!(bounded.len() <= MAX_TOPIC_LEN - 1);
        assert!(bounded.chars().all(|c| c == 'é'));
    }
}
