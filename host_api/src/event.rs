//! Event records and host buffer references

use sdk_types::{GpioPin, GpioPinState, GpioPort, TimerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a host-owned transient buffer
///
/// Holding a `BufferRef` grants no access to the bytes. The guest reads
/// them through [`HostApi::read_buffer`] and returns ownership with
/// [`HostApi::free_message_buffers`]; after the free the reference is
/// dead and every further read fails with `NotFound`.
///
/// [`HostApi::read_buffer`]: crate::HostApi::read_buffer
/// [`HostApi::free_message_buffers`]: crate::HostApi::free_message_buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferRef(u32);

impl BufferRef {
    /// Creates a buffer reference from a raw host handle
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw host handle
    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for BufferRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buf({})", self.0)
    }
}

/// One pending event, produced by the host and consumed exactly once
///
/// The host allocates and populates the record when a resource fires;
/// the guest retrieves it with [`HostApi::next_event`]. For `Message`
/// events the three buffer references are host-owned: the guest must
/// copy what it needs and then free them, or the host leaks.
///
/// [`HostApi::next_event`]: crate::HostApi::next_event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventRecord {
    /// A timer expired
    Timer {
        /// The timer that fired
        id: TimerId,
    },
    /// A GPIO pin changed level
    Gpio {
        /// Port of the pin that changed
        port: GpioPort,
        /// Pin that changed
        pin: GpioPin,
        /// Level after the change
        state: GpioPinState,
    },
    /// A pub/sub message arrived on a subscribed topic
    Message {
        /// Host-assigned sequence id, increments per message
        id: u32,
        /// Host-owned topic string
        topic: BufferRef,
        /// Host-owned content-type string
        content_type: BufferRef,
        /// Host-owned payload bytes
        payload: BufferRef,
        /// Host-reported payload length; may exceed what the buffer
        /// actually holds, consumers clamp
        payload_len: u32,
    },
    /// An event kind the dispatch core does not route
    Other {
        /// Raw resource-type tag as the host reported it
        kind: u32,
    },
}
