//! Topic matching contracts
//!
//! The match direction — a registered topic is a byte prefix of the
//! incoming one — and the first-match-wins rule are load-bearing and
//! pinned here.
