//! GPIO identity and pin state types

use crate::limits::{GPIO_MAX_PORTS, GPIO_PINS_PER_PORT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GpioPort(u32);

impl GpioPort {
    /// Creates a port identity
    pub const fn new(port: u32) -> Self {
        Self(port)
    }

    /// Returns the raw port number
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns whether the host exposes this port
    pub fn is_valid(&self) -> bool {
        self.0 < GPIO_MAX_PORTS
    }
}

impl fmt::Display for GpioPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Port({})", self.0)
    }
}

/// Identity of a pin within a GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GpioPin(u32);

impl GpioPin {
    /// Creates a pin identity
    pub const fn new(pin: u32) -> Self {
        Self(pin)
    }

    /// Returns the raw pin number
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns whether the pin number exists on a port
    pub fn is_valid(&self) -> bool {
        self.0 < GPIO_PINS_PER_PORT
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pin({})", self.0)
    }
}

/// Electrical level of a GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpioPinState {
    /// Pin low
    Reset,
    /// Pin high
    Set,
}

impl GpioPinState {
    /// Returns the opposite level
    pub fn toggled(self) -> Self {
        match self {
            GpioPinState::Reset => GpioPinState::Set,
            GpioPinState::Set => GpioPinState::Reset,
        }
    }
}

/// Configured direction of a GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpioDirection {
    /// Pin driven by the outside world
    Input,
    /// Pin driven by the guest
    Output,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validity() {
        assert!(GpioPort::new(0).is_valid());
        assert!(GpioPort::new(GPIO_MAX_PORTS - 1).is_valid());
        assert!(!GpioPort::new(GPIO_MAX_PORTS).is_valid());
    }

    #[test]
    fn test_pin_validity() {
        assert!(GpioPin::new(0).is_valid());
        assert!(GpioPin::new(GPIO_PINS_PER_PORT - 1).is_valid());
        assert!(!GpioPin::new(GPIO_PINS_PER_PORT).is_valid());
    }

    #[test]
    fn test_pin_state_toggle() {
        assert_eq!(GpioPinState::Reset.toggled(), GpioPinState::Set);
        assert_eq!(GpioPinState::Set.toggled(), GpioPinState::Reset);
    }
}
