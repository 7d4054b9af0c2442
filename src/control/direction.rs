//! DIR pin with cached level.

use embedded_hal::digital::OutputPin;

use crate::error::{HardwareError, Result};
use crate::motion::Direction;

/// DIR output that only writes on a change of direction.
pub struct DirectionPin<DIR> {
    pin: DIR,
    invert: bool,
    current: Option<Direction>,
}

impl<DIR: OutputPin> DirectionPin<DIR> {
    /// Wrap a DIR pin. Nothing is written until the first [`set`](Self::set).
    pub fn new(pin: DIR, invert: bool) -> Self {
        Self {
            pin,
            invert,
            current: None,
        }
    }

    /// Drive the pin for `direction`.
    pub fn set(&mut self, direction: Direction) -> Result<()> {
        if self.current == Some(direction) {
            return Ok(());
        }

        let result = if direction.pin_level(self.invert) {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| HardwareError::Pin)?;

        self.current = Some(direction);
        Ok(())
    }

    /// Last direction written.
    pub fn current(&self) -> Option<Direction> {
        self.current
    }

    /// Release the pin.
    pub fn into_inner(self) -> DIR {
        self.pin
    }
}
