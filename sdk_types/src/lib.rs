//! # SDK Types
//!
//! This crate defines the fundamental types shared by every crate in the
//! Nutshell guest SDK.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: resource identities are newtypes, not
//!   bare integers that can be swapped by accident.
//! - **Errors by value**: every fallible SDK operation returns the same
//!   flat [`SdkError`] enum. Nothing panics, nothing is thrown.
//! - **Compile-time capacity**: every table and buffer the SDK owns has
//!   a fixed limit declared in [`limits`], mirroring the host ABI.
//!
//! ## Key Types
//!
//! - [`SdkError`] / [`SdkResult`]: the closed error taxonomy
//! - [`ResourceKind`]: the event categories the host can deliver
//! - [`TimerId`], [`GpioPort`], [`GpioPin`]: resource identities

pub mod error;
pub mod gpio;
pub mod limits;
pub mod resource;

pub use error::{SdkError, SdkResult};
pub use gpio::{GpioDirection, GpioPin, GpioPinState, GpioPort};
pub use resource::{ResourceKind, TimerId};
