//! The host API trait

use crate::event::{BufferRef, EventRecord};
use sdk_types::{
    GpioDirection, GpioPin, GpioPinState, GpioPort, ResourceKind, SdkResult, TimerId,
};

/// Returns the guest export the host invokes for events of `kind`
///
/// Binding a dispatcher tells the host which guest-exported function to
/// call when an event of the given kind fires. The names are part of
/// the ABI. Kinds without a dispatch path return `None`.
pub fn dispatch_entry_point(kind: ResourceKind) -> Option<&'static str> {
    match kind {
        ResourceKind::Timer => Some("timer_callback"),
        ResourceKind::Gpio => Some("gpio_callback"),
        ResourceKind::Message => Some("message_callback"),
        ResourceKind::Sensor => None,
    }
}

/// The host API trait
///
/// This defines the interface between the guest SDK and the host
/// runtime. Multiple implementations are possible:
/// - In-process simulated host (for testing and demos)
/// - WASM import shim (real deployments)
///
/// # Design Principles
///
/// **Polling delivery**: the guest asks for events; the host never
/// preempts guest code. The only quasi-blocking call is `sleep_ms`.
///
/// **Explicit buffer ownership**: message buffers stay host-owned until
/// the guest frees them. Reads copy; nothing is borrowed across the
/// boundary.
///
/// **Forward progress over precision**: resource-control failures are
/// reported synchronously, but nothing here may wedge the event loop.
pub trait HostApi {
    /// Returns the next pending event, or `None` if the queue is empty
    ///
    /// Non-blocking. Events come back in the order the host recorded
    /// them; the host never reorders or coalesces.
    fn next_event(&mut self) -> Option<EventRecord>;

    /// Copies bytes from a host-owned buffer into `dst`
    ///
    /// Copies at most `dst.len()` bytes and returns the number copied.
    /// Fails with `NotFound` once the buffer has been freed.
    fn read_buffer(&self, buffer: BufferRef, dst: &mut [u8]) -> SdkResult<usize>;

    /// Returns ownership of the three buffers of a message event
    ///
    /// Must be called exactly once per message event. After this call
    /// all three references are dead.
    fn free_message_buffers(
        &mut self,
        topic: BufferRef,
        content_type: BufferRef,
        payload: BufferRef,
    ) -> SdkResult<()>;

    /// Blocks the guest's single thread for approximately `ms` milliseconds
    ///
    /// Not cancellable; there are no timeout semantics beyond the fixed
    /// duration.
    fn sleep_ms(&mut self, ms: u32);

    /// Tells the host which guest export dispatches events of `kind`
    ///
    /// Must succeed before any event of that kind can fire. Binding the
    /// same kind again is idempotent.
    fn bind_dispatcher(&mut self, kind: ResourceKind, entry_point: &str) -> SdkResult<()>;

    /// Requests hardware-level interrupt wiring for a pin
    fn arm_gpio_callback(&mut self, port: GpioPort, pin: GpioPin) -> SdkResult<()>;

    /// Releases hardware-level interrupt wiring for a pin
    fn disarm_gpio_callback(&mut self, port: GpioPort, pin: GpioPin) -> SdkResult<()>;

    /// Hands a message to the host's pub/sub transport
    fn publish(&mut self, topic: &str, content_type: &str, payload: &[u8]) -> SdkResult<()>;

    /// Asks the host to deliver message events for a topic to this guest
    fn subscribe(&mut self, topic: &str) -> SdkResult<()>;

    /// Creates a timer with the given id
    fn timer_create(&mut self, id: TimerId) -> SdkResult<()>;

    /// Starts a created timer
    fn timer_start(&mut self, id: TimerId, interval_ms: u32, periodic: bool) -> SdkResult<()>;

    /// Stops a running timer
    fn timer_stop(&mut self, id: TimerId) -> SdkResult<()>;

    /// Deletes a created timer
    fn timer_delete(&mut self, id: TimerId) -> SdkResult<()>;

    /// Returns the remaining time of a running timer in milliseconds
    fn timer_remaining_ms(&self, id: TimerId) -> SdkResult<u32>;

    /// Configures a pin's direction
    fn gpio_configure(
        &mut self,
        port: GpioPort,
        pin: GpioPin,
        direction: GpioDirection,
    ) -> SdkResult<()>;

    /// Drives an output pin to a level
    fn gpio_set(&mut self, port: GpioPort, pin: GpioPin, state: GpioPinState) -> SdkResult<()>;

    /// Reads a pin's current level
    fn gpio_get(&self, port: GpioPort, pin: GpioPin) -> SdkResult<GpioPinState>;

    /// Inverts an output pin's level
    fn gpio_toggle(&mut self, port: GpioPort, pin: GpioPin) -> SdkResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_entry_points() {
        assert_eq!(
            dispatch_entry_point(ResourceKind::Timer),
            Some("timer_callback")
        );
        assert_eq!(
            dispatch_entry_point(ResourceKind::Gpio),
            Some("gpio_callback")
        );
        assert_eq!(
            dispatch_entry_point(ResourceKind::Message),
            Some("message_callback")
        );
        assert_eq!(dispatch_entry_point(ResourceKind::Sensor), None);
    }
}
