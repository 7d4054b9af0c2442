//! Frequency-controlled feed axis (M2) with a home sensor.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{FeedConfig, PulseLimits};
use crate::error::{CommandError, MotionError, Result};
use crate::motion::{Direction, FrequencyChannel, PulseOutput};

use super::{is_asserted, DirectionPin};

const AXIS: u8 = 2;

/// Continuous feed in either direction. Reverse travel is refused, and
/// stopped, while the home sensor is asserted.
pub struct FeedAxis<P, DIR, HOME>
where
    P: PulseOutput,
    DIR: OutputPin,
    HOME: InputPin,
{
    channel: FrequencyChannel<P>,
    dir: DirectionPin<DIR>,
    home: HOME,
    config: FeedConfig,
    velocity: f32,
    direction: Direction,
}

impl<P, DIR, HOME> FeedAxis<P, DIR, HOME>
where
    P: PulseOutput,
    DIR: OutputPin,
    HOME: InputPin,
{
    /// Create a stopped feed. No velocity is set until the first run or
    /// `set_velocity`.
    pub fn new(output: P, dir: DIR, home: HOME, limits: PulseLimits, config: FeedConfig) -> Result<Self> {
        let mut dir = DirectionPin::new(dir, config.invert_direction);
        dir.set(Direction::Forward)?;

        Ok(Self {
            channel: FrequencyChannel::new(output, limits)?,
            dir,
            home,
            config,
            velocity: 0.0,
            direction: Direction::Forward,
        })
    }

    /// Feed in `direction` at the current velocity (the default if unset).
    ///
    /// A reversal while running stops the train before DIR changes.
    pub fn run(&mut self, direction: Direction) -> Result<f32> {
        if direction == Direction::Reverse && self.home_active()? {
            return Err(MotionError::HomeActive { axis: AXIS }.into());
        }

        if self.channel.is_running() && self.direction != direction {
            self.channel.stop()?;
        }
        self.dir.set(direction)?;
        self.direction = direction;

        if self.velocity == 0.0 {
            self.velocity = self.config.default_velocity.0;
        }
        let frequency = self
            .channel
            .run(self.config.frequency_for_velocity(self.velocity))?;
        debug!("feed {} at {} mm/s", direction.label(), self.velocity);
        Ok(frequency)
    }

    /// Stop pulsing. Idempotent.
    pub fn stop(&mut self) -> Result<()> {
        self.channel.stop()
    }

    /// Set the feed velocity in mm/s, retuning a running feed.
    ///
    /// Bounds are inclusive; rejected values leave state unchanged.
    pub fn set_velocity(&mut self, velocity: f32) -> Result<f32> {
        let (min, max) = (self.config.min_velocity.0, self.config.max_velocity.0);
        if !(min..=max).contains(&velocity) {
            return Err(CommandError::FeedVelocityOutOfRange { velocity, min, max }.into());
        }

        self.velocity = velocity;
        self.channel
            .retune(self.config.frequency_for_velocity(velocity))?;
        Ok(velocity)
    }

    /// Stop a reverse feed that has reached home.
    ///
    /// Returns `true` if the feed was stopped by this call.
    pub fn check_home_stop(&mut self) -> Result<bool> {
        if self.channel.is_running() && self.direction == Direction::Reverse && self.home_active()? {
            self.channel.stop()?;
            info!("feed stopped at home");
            return Ok(true);
        }
        Ok(false)
    }

    /// Whether the home sensor is asserted.
    pub fn home_active(&mut self) -> Result<bool> {
        is_asserted(&mut self.home)
    }

    /// Whether pulses are being produced.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.channel.is_running()
    }

    /// Velocity in mm/s (0 until set or first run).
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Current or last direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Programmed frequency (0 when stopped).
    #[inline]
    pub fn frequency(&self) -> f32 {
        self.channel.frequency()
    }

    /// Access the pulse generator.
    #[inline]
    pub fn output(&self) -> &P {
        self.channel.output()
    }
}
