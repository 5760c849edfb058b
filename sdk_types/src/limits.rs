//! Compile-time capacity limits
//!
//! These mirror the host ABI's configuration. The host sizes its side of
//! the dispatch tables and transient buffers to the same values, so they
//! are not tunable at runtime.

/// Maximum live callback slots per resource kind.
pub const MAX_CALLBACKS: usize = 64;

/// Maximum topic length in bytes, including room for the registry to
/// guarantee bounded storage (stored topics hold at most
/// `MAX_TOPIC_LEN - 1` bytes).
pub const MAX_TOPIC_LEN: usize = 128;

/// Maximum content-type length in bytes.
pub const MAX_CONTENT_TYPE_LEN: usize = 128;

/// Maximum message payload copied out of host memory, in bytes. Larger
/// host-reported payloads are silently truncated to this.
pub const MAX_PAYLOAD_LEN: usize = 1024;

/// Maximum timers the host will create for one guest.
pub const MAX_TIMERS: usize = 16;

/// Number of GPIO ports the host exposes.
pub const GPIO_MAX_PORTS: u32 = 8;

/// Number of pins on each GPIO port.
pub const GPIO_PINS_PER_PORT: u32 = 16;

/// Upper bound on events drained by one `process_events` call.
pub const MAX_EVENTS_PER_DRAIN: usize = 5;

/// Sleep inserted after each event retrieval attempt, in milliseconds.
pub const POLL_INTERVAL_MS: u32 = 10;
