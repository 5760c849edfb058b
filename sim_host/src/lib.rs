//! # Simulated Host
//!
//! This crate provides an in-process implementation of the host API.
//!
//! ## Purpose
//!
//! The simulated host allows testing guest applications without a WASM
//! runtime or hardware:
//! - Runs under `cargo test`
//! - Deterministic (scripted event queue, no real timers or pins)
//! - Fast (sleeps are recorded, not slept)
//! - Inspectable (buffer lifetimes, binds, arms, and publishes are all
//!   visible to tests)
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! The dispatch core's load-bearing invariants — one buffer free per
//! message event, bounded drains, delivery order — are only worth
//! stating if tests can observe them. This host records everything the
//! real host would do silently.
//!
//! This is not a stub: it is a full implementation of [`HostApi`] that
//! happens to run in-process.

use host_api::{BufferRef, EventRecord, HostApi};
use log::debug;
use sdk_types::limits::MAX_TIMERS;
use sdk_types::{
    GpioDirection, GpioPin, GpioPinState, GpioPort, ResourceKind, SdkError, SdkResult, TimerId,
};
use std::collections::{HashMap, HashSet, VecDeque};

/// A message the guest handed to `publish`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    /// Routing topic
    pub topic: String,
    /// Declared payload format
    pub content_type: String,
    /// Payload bytes
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
struct TimerState {
    interval_ms: u32,
    #[allow(dead_code)]
    periodic: bool,
    running: bool,
}

/// Deterministic in-process host runtime
///
/// Events are delivered strictly in the order they were queued. Host
/// buffers live in an explicit table so tests can verify the guest
/// frees exactly what it was handed.
pub struct SimulatedHost {
    /// Pending events, FIFO
    queue: VecDeque<EventRecord>,
    /// Live host-owned buffers
    buffers: HashMap<u32, Vec<u8>>,
    next_buffer: u32,
    next_message_id: u32,
    /// Number of free calls attempted by the guest (counting failures)
    free_calls: u32,
    /// Buffers actually released
    freed: Vec<BufferRef>,
    /// When set, the next free call fails with `Busy`
    fail_next_free: bool,
    /// Dispatcher bindings the guest established
    bound: Vec<(ResourceKind, String)>,
    /// Kinds for which binding is refused (fault injection)
    bind_refusals: HashSet<ResourceKind>,
    /// Pins with hardware callbacks armed
    armed: HashSet<(GpioPort, GpioPin)>,
    /// Topics the guest subscribed to
    subscriptions: Vec<String>,
    /// Messages the guest published
    published: Vec<PublishedMessage>,
    /// Milliseconds of recorded (not real) sleep
    total_slept_ms: u64,
    sleep_calls: u32,
    /// Created timers
    timers: HashMap<TimerId, TimerState>,
    /// Configured pins and their levels
    pins: HashMap<(GpioPort, GpioPin), (GpioDirection, GpioPinState)>,
}

impl SimulatedHost {
    /// Creates a host with nothing queued or configured
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            buffers: HashMap::new(),
            next_buffer: 1,
            next_message_id: 1,
            free_calls: 0,
            freed: Vec::new(),
            fail_next_free: false,
            bound: Vec::new(),
            bind_refusals: HashSet::new(),
            armed: HashSet::new(),
            subscriptions: Vec::new(),
            published: Vec::new(),
            total_slept_ms: 0,
            sleep_calls: 0,
            timers: HashMap::new(),
            pins: HashMap::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Event scripting
    // -------------------------------------------------------------------------

    /// Queues a timer event directly, bypassing timer bookkeeping
    pub fn push_timer_event(&mut self, id: TimerId) {
        self.queue.push_back(EventRecord::Timer { id });
    }

    /// Queues a GPIO event directly, bypassing the armed check
    pub fn push_gpio_event(&mut self, port: GpioPort, pin: GpioPin, state: GpioPinState) {
        self.queue.push_back(EventRecord::Gpio { port, pin, state });
    }

    /// Queues a message event, allocating host buffers for its topic,
    /// content type, and payload; returns the assigned message id
    pub fn push_message_event(
        &mut self,
        topic: &str,
        content_type: &str,
        payload: &[u8],
    ) -> u32 {
        let topic_ref = self.alloc_buffer(topic.as_bytes());
        let content_type_ref = self.alloc_buffer(content_type.as_bytes());
        let payload_ref = self.alloc_buffer(payload);
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.queue.push_back(EventRecord::Message {
            id,
            topic: topic_ref,
            content_type: content_type_ref,
            payload: payload_ref,
            payload_len: payload.len() as u32,
        });
        id
    }

    /// Queues an event of a kind the dispatch core does not route
    pub fn push_unknown_event(&mut self, kind: u32) {
        self.queue.push_back(EventRecord::Other { kind });
    }

    /// Fires a created, running timer
    ///
    /// Fails with `NotFound` if the timer was never created or is
    /// stopped; use [`SimulatedHost::push_timer_event`] to script
    /// events without bookkeeping.
    pub fn fire_timer(&mut self, id: TimerId) -> SdkResult<()> {
        match self.timers.get(&id) {
            Some(state) if state.running => {
                self.push_timer_event(id);
                Ok(())
            }
            _ => Err(SdkError::NotFound),
        }
    }

    /// Simulates the outside world driving an armed input pin
    ///
    /// Updates the pin's level and queues a GPIO event. Fails with
    /// `NotFound` when no hardware callback is armed for the pin.
    pub fn fire_gpio(&mut self, port: GpioPort, pin: GpioPin, state: GpioPinState) -> SdkResult<()> {
        if !self.armed.contains(&(port, pin)) {
            return Err(SdkError::NotFound);
        }
        if let Some((_, level)) = self.pins.get_mut(&(port, pin)) {
            *level = state;
        }
        self.push_gpio_event(port, pin, state);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Fault injection
    // -------------------------------------------------------------------------

    /// Makes the next `free_message_buffers` call fail with `Busy`
    /// without releasing anything
    pub fn fail_next_free(&mut self) {
        self.fail_next_free = true;
    }

    /// Refuses future dispatcher bindings for a resource kind
    pub fn refuse_bind(&mut self, kind: ResourceKind) {
        self.bind_refusals.insert(kind);
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Number of events still queued
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Number of free calls the guest attempted, counting failed ones
    pub fn free_call_count(&self) -> u32 {
        self.free_calls
    }

    /// Buffers actually released so far
    pub fn freed_buffers(&self) -> &[BufferRef] {
        &self.freed
    }

    /// Whether a host buffer is still live
    pub fn buffer_exists(&self, buffer: BufferRef) -> bool {
        self.buffers.contains_key(&buffer.as_raw())
    }

    /// Dispatcher bindings established by the guest, in order
    pub fn bound_dispatchers(&self) -> &[(ResourceKind, String)] {
        &self.bound
    }

    /// Whether a hardware callback is armed for a pin
    pub fn is_armed(&self, port: GpioPort, pin: GpioPin) -> bool {
        self.armed.contains(&(port, pin))
    }

    /// Topics the guest subscribed to, in order
    pub fn subscriptions(&self) -> &[String] {
        &self.subscriptions
    }

    /// Messages the guest published, in order
    pub fn published(&self) -> &[PublishedMessage] {
        &self.published
    }

    /// Total milliseconds of recorded sleep
    pub fn total_slept_ms(&self) -> u64 {
        self.total_slept_ms
    }

    /// Number of sleep calls
    pub fn sleep_call_count(&self) -> u32 {
        self.sleep_calls
    }

    fn alloc_buffer(&mut self, bytes: &[u8]) -> BufferRef {
        let raw = self.next_buffer;
        self.next_buffer += 1;
        self.buffers.insert(raw, bytes.to_vec());
        BufferRef::from_raw(raw)
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostApi for SimulatedHost {
    fn next_event(&mut self) -> Option<EventRecord> {
        self.queue.pop_front()
    }

    fn read_buffer(&self, buffer: BufferRef, dst: &mut [u8]) -> SdkResult<usize> {
        let bytes = self
            .buffers
            .get(&buffer.as_raw())
            .ok_or(SdkError::NotFound)?;
        let len = bytes.len().min(dst.len());
        dst[..len].copy_from_slice(&bytes[..len]);
        Ok(len)
    }

    fn free_message_buffers(
        &mut self,
        topic: BufferRef,
        content_type: BufferRef,
        payload: BufferRef,
    ) -> SdkResult<()> {
        self.free_calls += 1;
        if self.fail_next_free {
            self.fail_next_free = false;
            return Err(SdkError::Busy);
        }
        let refs = [topic, content_type, payload];
        if refs.iter().any(|r| !self.buffers.contains_key(&r.as_raw())) {
            return Err(SdkError::NotFound);
        }
        for r in refs {
            self.buffers.remove(&r.as_raw());
            self.freed.push(r);
        }
        Ok(())
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.total_slept_ms += u64::from(ms);
        self.sleep_calls += 1;
    }

    fn bind_dispatcher(&mut self, kind: ResourceKind, entry_point: &str) -> SdkResult<()> {
        if self.bind_refusals.contains(&kind) {
            return Err(SdkError::Invalid);
        }
        if !self.bound.iter().any(|(bound_kind, _)| *bound_kind == kind) {
            self.bound.push((kind, entry_point.to_string()));
        }
        Ok(())
    }

    fn arm_gpio_callback(&mut self, port: GpioPort, pin: GpioPin) -> SdkResult<()> {
        if !port.is_valid() || !pin.is_valid() {
            return Err(SdkError::Invalid);
        }
        self.armed.insert((port, pin));
        Ok(())
    }

    fn disarm_gpio_callback(&mut self, port: GpioPort, pin: GpioPin) -> SdkResult<()> {
        if self.armed.remove(&(port, pin)) {
            Ok(())
        } else {
            Err(SdkError::NotFound)
        }
    }

    fn publish(&mut self, topic: &str, content_type: &str, payload: &[u8]) -> SdkResult<()> {
        if topic.is_empty() {
            return Err(SdkError::Invalid);
        }
        self.published.push(PublishedMessage {
            topic: topic.to_string(),
            content_type: content_type.to_string(),
            payload: payload.to_vec(),
        });
        // Loop-back delivery: the real broker routes between guests;
        // here a publish matching one of our own subscriptions comes
        // straight back as a message event.
        let subscribed = self
            .subscriptions
            .iter()
            .any(|sub| topic.as_bytes().starts_with(sub.as_bytes()));
        if subscribed {
            debug!("loop-back delivery of {topic}");
            self.push_message_event(topic, content_type, payload);
        }
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> SdkResult<()> {
        if topic.is_empty() {
            return Err(SdkError::Invalid);
        }
        if !self.subscriptions.iter().any(|sub| sub == topic) {
            self.subscriptions.push(topic.to_string());
        }
        Ok(())
    }

    fn timer_create(&mut self, id: TimerId) -> SdkResult<()> {
        let raw = id.as_u32() as usize;
        if raw < 1 || raw > MAX_TIMERS {
            return Err(SdkError::Invalid);
        }
        if self.timers.contains_key(&id) {
            return Err(SdkError::Busy);
        }
        self.timers.insert(
            id,
            TimerState {
                interval_ms: 0,
                periodic: false,
                running: false,
            },
        );
        Ok(())
    }

    fn timer_start(&mut self, id: TimerId, interval_ms: u32, periodic: bool) -> SdkResult<()> {
        let state = self.timers.get_mut(&id).ok_or(SdkError::NotFound)?;
        state.interval_ms = interval_ms;
        state.periodic = periodic;
        state.running = true;
        Ok(())
    }

    fn timer_stop(&mut self, id: TimerId) -> SdkResult<()> {
        let state = self.timers.get_mut(&id).ok_or(SdkError::NotFound)?;
        state.running = false;
        Ok(())
    }

    fn timer_delete(&mut self, id: TimerId) -> SdkResult<()> {
        self.timers.remove(&id).ok_or(SdkError::NotFound)?;
        Ok(())
    }

    fn timer_remaining_ms(&self, id: TimerId) -> SdkResult<u32> {
        let state = self.timers.get(&id).ok_or(SdkError::NotFound)?;
        // No real clock: a running timer always reports its full interval.
        if state.running {
            Ok(state.interval_ms)
        } else {
            Ok(0)
        }
    }

    fn gpio_configure(
        &mut self,
        port: GpioPort,
        pin: GpioPin,
        direction: GpioDirection,
    ) -> SdkResult<()> {
        if !port.is_valid() || !pin.is_valid() {
            return Err(SdkError::Invalid);
        }
        self.pins
            .insert((port, pin), (direction, GpioPinState::Reset));
        Ok(())
    }

    fn gpio_set(&mut self, port: GpioPort, pin: GpioPin, state: GpioPinState) -> SdkResult<()> {
        let (direction, level) = self.pins.get_mut(&(port, pin)).ok_or(SdkError::NotFound)?;
        if *direction != GpioDirection::Output {
            return Err(SdkError::Invalid);
        }
        *level = state;
        Ok(())
    }

    fn gpio_get(&self, port: GpioPort, pin: GpioPin) -> SdkResult<GpioPinState> {
        let (_, level) = self.pins.get(&(port, pin)).ok_or(SdkError::NotFound)?;
        Ok(*level)
    }

    fn gpio_toggle(&mut self, port: GpioPort, pin: GpioPin) -> SdkResult<()> {
        let current = self.gpio_get(port, pin)?;
        self.gpio_set(port, pin, current.toggled())
    }
}
