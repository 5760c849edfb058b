//! # Event Dispatch
//!
//! This crate implements the guest side of event delivery: callback
//! registries for the three routable resource kinds and the polling
//! pump that drains host events into callback invocations.
//!
//! ## Philosophy
//!
//! - **One context, no globals**: all mutable dispatch state lives in a
//!   [`SdkContext`] the application owns and drives.
//! - **Cooperative by contract**: the host never calls into the guest
//!   on its own. The application loops on
//!   [`SdkContext::process_events`]; ordering and aliasing guarantees
//!   depend on that single-threaded discipline.
//! - **Copy, free, then dispatch**: message buffers are host-owned.
//!   The pump copies them out and frees them before any callback runs,
//!   on every path, so a missing callback can never leak host memory.
//!
//! ## Structure
//!
//! - [`registry`]: fixed-capacity callback tables with slot reuse
//! - [`topic`]: the byte-prefix topic match predicate
//! - [`context`]: the guest-facing surface and the event pump

pub mod context;
pub mod registry;
pub mod topic;

pub use context::SdkContext;
pub use registry::{CallbackRegistry, GpioCallback, MessageCallback, TimerCallback};
pub use topic::topic_matches;
