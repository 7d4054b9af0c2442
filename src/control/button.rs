//! Debounced encoder-reset button.

use embedded_hal::digital::InputPin;

use crate::error::{HardwareError, Result};

/// Active-low push button: one trigger per press, after the level has been
/// stable low for longer than the debounce time.
pub struct ResetButton<BTN> {
    pin: BTN,
    debounce_ms: u32,
    last_level: bool,
    last_edge_ms: u32,
    triggered: bool,
}

impl<BTN: InputPin> ResetButton<BTN> {
    /// Sample the resting level and start watching.
    pub fn new(mut pin: BTN, debounce_ms: u32, now_ms: u32) -> Result<Self> {
        let last_level = pin.is_high().map_err(|_| HardwareError::Pin)?;
        Ok(Self {
            pin,
            debounce_ms,
            last_level,
            last_edge_ms: now_ms,
            triggered: false,
        })
    }

    /// Returns `true` once per debounced press.
    pub fn poll(&mut self, now_ms: u32) -> Result<bool> {
        let level = self.pin.is_high().map_err(|_| HardwareError::Pin)?;

        if level != self.last_level {
            self.last_edge_ms = now_ms;
            self.last_level = level;
            if level {
                // released, arm for the next press
                self.triggered = false;
            }
        }

        if !self.triggered && !level && now_ms.wrapping_sub(self.last_edge_ms) > self.debounce_ms {
            self.triggered = true;
            return Ok(true);
        }
        Ok(false)
    }
}
