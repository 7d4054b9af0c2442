//! Axis controllers.
//!
//! Each axis owns its DIR pin and sensors and borrows the interrupt-shared
//! engines. Home/limit sensors and buttons are active-low.

mod button;
mod closed_loop;
mod direction;
mod feed;
mod spindle;

pub use button::ResetButton;
pub use closed_loop::{ClosedLoopController, LoopEvent, LoopState, StopReport};
pub use direction::DirectionPin;
pub use feed::FeedAxis;
pub use spindle::SpindleAxis;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};

use crate::error::{HardwareError, Result};

/// Placeholder for an unfitted sensor or button. Always reads released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotConnected;

impl ErrorType for NotConnected {
    type Error = Infallible;
}

impl InputPin for NotConnected {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(false)
    }
}

/// Active-low sensor read.
pub(crate) fn is_asserted<P: InputPin>(pin: &mut P) -> Result<bool> {
    pin.is_low().map_err(|_| HardwareError::Pin.into())
}
