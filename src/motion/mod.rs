//! Step pulse generation.
//!
//! Two engines share this module:
//! - [`FrequencyChannel`] drives a hardware pulse generator at a clamped
//!   frequency (continuous rotation).
//! - [`StepEngine`] is the tick-driven step counter used for positioning.

mod frequency;
mod step_engine;

pub use frequency::FrequencyChannel;
pub use step_engine::{step_tick, MotionState, PulseEdge, StepEngine};

/// Direction of axis motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count.
    #[default]
    Forward,
    /// Negative step count.
    Reverse,
}

impl Direction {
    /// Direction that reduces a signed error (zero counts as forward).
    #[inline]
    pub fn from_error(error: f32) -> Self {
        if error >= 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }

    /// DIR pin level for this direction.
    #[inline]
    pub fn pin_level(self, invert: bool) -> bool {
        (self == Direction::Forward) != invert
    }

    /// Protocol token.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Direction::Forward => "FWD",
            Direction::Reverse => "REV",
        }
    }
}

/// Hardware pulse generator for frequency mode (PWM/MCPWM style).
///
/// `enable` starts a 50 % duty pulse train at the last programmed
/// frequency; `disable` must hold the output low.
pub trait PulseOutput {
    /// Peripheral error type.
    type Error: core::fmt::Debug;

    /// Program the pulse frequency. Takes effect without stopping the train.
    fn set_frequency(&mut self, hz: f32) -> Result<(), Self::Error>;

    /// Start (or keep) producing pulses.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Stop producing pulses and hold the output low.
    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// Periodic timer that calls [`StepEngine::on_tick`] from interrupt context.
pub trait TickTimer {
    /// Peripheral error type.
    type Error: core::fmt::Debug;

    /// Program the tick period. Takes effect on the next tick boundary.
    fn set_period_us(&mut self, period_us: u32) -> Result<(), Self::Error>;
}
