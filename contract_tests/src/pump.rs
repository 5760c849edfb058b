//! Event pump contracts
//!
//! Buffer lifetime, drain bounds, and truncation behavior.
