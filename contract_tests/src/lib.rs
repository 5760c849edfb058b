//! # Dispatch Contract Tests
//!
//! This crate provides "golden" tests for the event dispatch contract
//! to ensure it doesn't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: the dispatch guarantees are written as
//!   code, not prose
//! - **Testability first**: every test goes through the public surface
//!   (`SdkContext` over `SimulatedHost`), never through crate internals
//! - **Mechanism not policy**: the tests pin what must stay stable —
//!   capacities, match direction, buffer lifetimes, drain bounds — not
//!   how applications should use them
//!
//! ## Structure
//!
//! - [`registry`]: capacity, idempotency, and unregistration contracts
//! - [`topics`]: prefix-match direction and first-match-wins
//! - [`pump`]: buffer lifetime, bounded drains, truncation
//! - [`scenarios`]: end-to-end timer and pub/sub round trips

pub mod pump;
pub mod registry;
pub mod scenarios;
pub mod topics;

/// Common helpers for driving a context over a simulated host
pub mod test_helpers {
    use event_dispatch::SdkContext;
    use sim_host::SimulatedHost;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Creates a fresh context over an empty simulated host
    pub fn context() -> SdkContext<SimulatedHost> {
        SdkContext::new(SimulatedHost::new())
    }

    /// A shared counter plus a closure that increments it
    pub fn counter() -> (Rc<RefCell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(RefCell::new(0));
        let inner = count.clone();
        (count, move || *inner.borrow_mut() += 1)
    }

    /// A shared topic log plus a message closure that appends to it
    pub fn topic_log() -> (
        Rc<RefCell<Vec<String>>>,
        impl FnMut(&str, &str, &[u8]) + 'static,
    ) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let inner = log.clone();
        (log, move |topic: &str, _: &str, _: &[u8]| {
            inner.borrow_mut().push(topic.to_string())
        })
    }
}
