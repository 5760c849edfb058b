//! The guest context and event pump

use crate::registry::CallbackRegistry;
use host_api::{dispatch_entry_point, BufferRef, EventRecord, HostApi};
use log::{debug, warn};
use sdk_types::limits::{
    MAX_CONTENT_TYPE_LEN, MAX_EVENTS_PER_DRAIN, MAX_PAYLOAD_LEN, MAX_TOPIC_LEN, POLL_INTERVAL_MS,
};
use sdk_types::{
    GpioDirection, GpioPin, GpioPinState, GpioPort, ResourceKind, SdkError, SdkResult, TimerId,
};

/// The guest application's handle on the SDK
///
/// Owns the host connection and the callback registry. There is no
/// hidden global state: an application creates one context, registers
/// its callbacks, and then drives [`SdkContext::process_events`] from
/// its main loop.
///
/// # Scheduling Contract
///
/// Strictly single-threaded and cooperative. Events only ever reach
/// callbacks from inside `process_events`, in the order the host
/// reported them. Callbacks run synchronously and are expected to
/// return promptly; nothing here cancels or times them out.
pub struct SdkContext<H: HostApi> {
    host: H,
    registry: CallbackRegistry,
}

impl<H: HostApi> SdkContext<H> {
    /// Creates a context over a host connection
    pub fn new(host: H) -> Self {
        Self {
            host,
            registry: CallbackRegistry::new(),
        }
    }

    /// Returns the host connection (mainly for tests and demos driving
    /// a simulated host)
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host connection
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // -------------------------------------------------------------------------
    // Callback registration
    // -------------------------------------------------------------------------

    /// Registers a callback for a timer id
    ///
    /// Fails with `Invalid` if the id is out of range or the dispatch
    /// binding cannot be established. Re-registering the same id
    /// replaces the callback.
    pub fn register_timer_callback(
        &mut self,
        id: TimerId,
        callback: impl FnMut() + 'static,
    ) -> SdkResult<()> {
        if !id.in_callback_range() {
            return Err(SdkError::Invalid);
        }
        self.bind(ResourceKind::Timer)?;
        self.registry.register_timer(id, Box::new(callback))
    }

    /// Registers a callback for a `(port, pin)` pair and arms the
    /// hardware callback on the host
    ///
    /// An arm failure is returned to the caller; the registry entry
    /// stays installed in that case and can be unregistered normally.
    pub fn register_gpio_callback(
        &mut self,
        port: GpioPort,
        pin: GpioPin,
        callback: impl FnMut() + 'static,
    ) -> SdkResult<()> {
        if !port.is_valid() || !pin.is_valid() {
            return Err(SdkError::Invalid);
        }
        self.bind(ResourceKind::Gpio)?;
        self.registry.register_gpio(port, pin, Box::new(callback))?;
        self.host.arm_gpio_callback(port, pin)
    }

    /// Registers a callback for a topic
    ///
    /// The callback fires for every incoming message whose topic begins
    /// with `topic` (see [`crate::topic_matches`]). Registering does
    /// not subscribe; call [`SdkContext::subscribe_message`] so the
    /// host produces message events in the first place.
    pub fn register_message_callback(
        &mut self,
        topic: &str,
        callback: impl FnMut(&str, &str, &[u8]) + 'static,
    ) -> SdkResult<()> {
        if topic.is_empty() {
            return Err(SdkError::Invalid);
        }
        self.bind(ResourceKind::Message)?;
        self.registry.register_message(topic, Box::new(callback))
    }

    /// Removes the callback for a timer id
    pub fn unregister_timer_callback(&mut self, id: TimerId) -> SdkResult<()> {
        self.registry.unregister_timer(id)
    }

    /// Removes the callback for a `(port, pin)` pair and disarms the
    /// hardware callback
    pub fn unregister_gpio_callback(&mut self, port: GpioPort, pin: GpioPin) -> SdkResult<()> {
        self.registry.unregister_gpio(port, pin)?;
        self.host.disarm_gpio_callback(port, pin)
    }

    /// Removes the callback registered for exactly `topic`
    pub fn unregister_message_callback(&mut self, topic: &str) -> SdkResult<()> {
        self.registry.unregister_message(topic)
    }

    // -------------------------------------------------------------------------
    // Pub/sub
    // -------------------------------------------------------------------------

    /// Hands a message to the host's pub/sub transport
    pub fn publish_message(
        &mut self,
        topic: &str,
        content_type: &str,
        payload: &[u8],
    ) -> SdkResult<()> {
        if topic.is_empty() {
            return Err(SdkError::Invalid);
        }
        self.host.publish(topic, content_type, payload)
    }

    /// Asks the host to deliver message events for a topic
    pub fn subscribe_message(&mut self, topic: &str) -> SdkResult<()> {
        if topic.is_empty() {
            return Err(SdkError::Invalid);
        }
        self.host.subscribe(topic)
    }

    // -------------------------------------------------------------------------
    // Timer and GPIO control pass-throughs
    // -------------------------------------------------------------------------

    /// Creates a host timer
    pub fn create_timer(&mut self, id: TimerId) -> SdkResult<()> {
        self.host.timer_create(id)
    }

    /// Starts a host timer
    pub fn start_timer(&mut self, id: TimerId, interval_ms: u32, periodic: bool) -> SdkResult<()> {
        self.host.timer_start(id, interval_ms, periodic)
    }

    /// Stops a host timer
    pub fn stop_timer(&mut self, id: TimerId) -> SdkResult<()> {
        self.host.timer_stop(id)
    }

    /// Deletes a host timer
    pub fn delete_timer(&mut self, id: TimerId) -> SdkResult<()> {
        self.host.timer_delete(id)
    }

    /// Returns a running timer's remaining milliseconds
    pub fn timer_remaining_ms(&self, id: TimerId) -> SdkResult<u32> {
        self.host.timer_remaining_ms(id)
    }

    /// Configures a pin's direction
    pub fn configure_gpio(
        &mut self,
        port: GpioPort,
        pin: GpioPin,
        direction: GpioDirection,
    ) -> SdkResult<()> {
        self.host.gpio_configure(port, pin, direction)
    }

    /// Drives an output pin
    pub fn set_gpio(&mut self, port: GpioPort, pin: GpioPin, state: GpioPinState) -> SdkResult<()> {
        self.host.gpio_set(port, pin, state)
    }

    /// Reads a pin's level
    pub fn read_gpio(&self, port: GpioPort, pin: GpioPin) -> SdkResult<GpioPinState> {
        self.host.gpio_get(port, pin)
    }

    /// Inverts an output pin
    pub fn toggle_gpio(&mut self, port: GpioPort, pin: GpioPin) -> SdkResult<()> {
        self.host.gpio_toggle(port, pin)
    }

    // -------------------------------------------------------------------------
    // Event pump
    // -------------------------------------------------------------------------

    /// Drains up to [`MAX_EVENTS_PER_DRAIN`] pending host events and
    /// invokes the matching registered callbacks
    ///
    /// Call this repeatedly from the application's main loop. Each
    /// retrieval attempt sleeps [`POLL_INTERVAL_MS`] on the host; if
    /// the whole call drained nothing, one extra sleep keeps an idle
    /// loop from spinning hot.
    ///
    /// Host failures never escalate out of the pump: an empty queue
    /// ends the drain, an unregistered resource firing is skipped, and
    /// a failed buffer free is logged while dispatch proceeds with the
    /// guest-local copies.
    pub fn process_events(&mut self) {
        let mut processed = 0;
        while processed < MAX_EVENTS_PER_DRAIN {
            let event = self.host.next_event();
            self.host.sleep_ms(POLL_INTERVAL_MS);
            let Some(event) = event else {
                break;
            };
            match event {
                EventRecord::Timer { id } => match self.registry.timer_callback(id) {
                    Some(callback) => callback(),
                    None => debug!("no timer callback registered for {id}"),
                },
                EventRecord::Gpio { port, pin, state } => {
                    debug!("gpio event: {port} {pin} now {state:?}");
                    match self.registry.gpio_callback(port, pin) {
                        Some(callback) => callback(),
                        None => debug!("no gpio callback registered for {port} {pin}"),
                    }
                }
                EventRecord::Message {
                    id,
                    topic,
                    content_type,
                    payload,
                    payload_len,
                } => self.dispatch_message(id, topic, content_type, payload, payload_len),
                EventRecord::Other { kind } => {
                    debug!("ignoring event of unrouted kind {kind}");
                }
            }
            processed += 1;
        }
        if processed == 0 {
            self.host.sleep_ms(POLL_INTERVAL_MS);
        }
    }

    /// Copies a message event out of host memory, frees the host
    /// buffers, and only then dispatches the guest-local copies
    ///
    /// The free happens on every path, matched or not. A registered
    /// callback therefore never observes host memory, only the copies,
    /// and a missing callback cannot leak the host's allocations.
    fn dispatch_message(
        &mut self,
        id: u32,
        topic: BufferRef,
        content_type: BufferRef,
        payload: BufferRef,
        payload_len: u32,
    ) {
        let topic_copy = self.read_string(topic, MAX_TOPIC_LEN - 1);
        let content_type_copy = self.read_string(content_type, MAX_CONTENT_TYPE_LEN - 1);
        let payload_copy = self.read_bytes(payload, (payload_len as usize).min(MAX_PAYLOAD_LEN));

        if let Err(err) = self
            .host
            .free_message_buffers(topic, content_type, payload)
        {
            warn!("message {id}: host buffers were not freed: {err}");
        }

        match self.registry.message_callback(&topic_copy) {
            Some(callback) => callback(&topic_copy, &content_type_copy, &payload_copy),
            None => debug!("no message callback registered for topic {topic_copy}"),
        }
    }

    /// Copies up to `max` bytes from a host buffer
    fn read_bytes(&self, buffer: BufferRef, max: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; max];
        let copied = match self.host.read_buffer(buffer, &mut bytes) {
            Ok(copied) => copied,
            Err(err) => {
                debug!("host buffer {buffer} unreadable: {err}");
                0
            }
        };
        bytes.truncate(copied);
        bytes
    }

    /// Copies a bounded UTF-8 string from a host buffer
    fn read_string(&self, buffer: BufferRef, max: usize) -> String {
        String::from_utf8_lossy(&self.read_bytes(buffer, max)).into_owned()
    }

    /// Establishes the host-side dispatch binding for a resource kind
    ///
    /// A bind refusal surfaces as `Invalid`, matching the registration
    /// error contract.
    fn bind(&mut self, kind: ResourceKind) -> SdkResult<()> {
        let entry_point = dispatch_entry_point(kind).ok_or(SdkError::Invalid)?;
        self.host
            .bind_dispatcher(kind, entry_point)
            .map_err(|err| {
                debug!("failed to bind {kind} dispatcher: {err}");
                SdkError::Invalid
            })
    }
}
