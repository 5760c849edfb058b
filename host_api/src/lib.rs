//! # Host API
//!
//! This crate defines the interface between a guest application and the
//! host runtime that embeds it.
//!
//! ## Philosophy
//!
//! The host provides **mechanisms**, not policies:
//! - Event delivery by polling (no interrupts into guest code)
//! - Explicit buffer ownership (copy out, then free — never borrow)
//! - Resource control as thin, synchronous calls
//!
//! ## Design Goals
//!
//! 1. **Testability**: the entire boundary is one trait that can be
//!    implemented in-process ([`sim_host`] does exactly that)
//! 2. **Explicitness**: host-owned memory is an opaque [`BufferRef`],
//!    never a pointer the guest could dereference
//! 3. **Simplicity**: one method per host entry point
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - The host's event queue wire format (opaque to the guest)
//! - A driver model (GPIO/timer calls are forwarded verbatim)
//! - A transport (WASM imports, linear-memory shims, and in-process
//!   simulations are all valid implementations)
//!
//! [`sim_host`]: ../sim_host/index.html

pub mod event;
pub mod host;

pub use event::{BufferRef, EventRecord};
pub use host::{dispatch_entry_point, HostApi};
