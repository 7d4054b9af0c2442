//! Frequency-controlled spindle axis (M1).

use embedded_hal::digital::OutputPin;

use crate::config::{PulseLimits, SpindleConfig};
use crate::error::{CommandError, Result};
use crate::motion::{Direction, FrequencyChannel, PulseOutput};

use super::DirectionPin;

/// Open-loop spindle running at a commanded speed.
pub struct SpindleAxis<P: PulseOutput, DIR: OutputPin> {
    channel: FrequencyChannel<P>,
    dir: DirectionPin<DIR>,
    config: SpindleConfig,
    rpm: u16,
}

impl<P: PulseOutput, DIR: OutputPin> SpindleAxis<P, DIR> {
    /// Create a stopped spindle with DIR set for forward rotation.
    pub fn new(output: P, dir: DIR, limits: PulseLimits, config: SpindleConfig) -> Result<Self> {
        let mut dir = DirectionPin::new(dir, config.invert_direction);
        dir.set(Direction::Forward)?;

        Ok(Self {
            channel: FrequencyChannel::new(output, limits)?,
            dir,
            config,
            rpm: 0,
        })
    }

    /// Run at `rpm`. Out-of-range speeds are rejected with no state change.
    ///
    /// Returns the programmed frequency (clamped to the pulse limits).
    pub fn run_rpm(&mut self, rpm: i32) -> Result<f32> {
        let (min, max) = (self.config.min_rpm, self.config.max_rpm);
        let accepted = u16::try_from(rpm)
            .ok()
            .filter(|rpm| (min..=max).contains(rpm))
            .ok_or(CommandError::RpmOutOfRange { rpm, min, max })?;

        let frequency = self.channel.run(self.config.frequency_for_rpm(accepted))?;
        self.rpm = accepted;
        debug!("spindle {} rpm at {} Hz", accepted, frequency);
        Ok(frequency)
    }

    /// Stop pulsing. The last speed is kept for status.
    pub fn stop(&mut self) -> Result<()> {
        self.channel.stop()
    }

    /// Whether pulses are being produced.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.channel.is_running()
    }

    /// Last accepted speed.
    #[inline]
    pub fn rpm(&self) -> u16 {
        self.rpm
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use core::convert::Infallible;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[derive(Default)]
    struct Pwm {
        hz: f32,
        enabled: bool,
    }

    impl PulseOutput for Pwm {
        type Error = Infallible;

        fn set_frequency(&mut self, hz: f32) -> core::result::Result<(), Infallible> {
            self.hz = hz;
            Ok(())
        }
        fn enable(&mut self) -> core::result::Result<(), Infallible> {
            self.enabled = true;
            Ok(())
        }
        fn disable(&mut self) -> core::result::Result<(), Infallible> {
            self.enabled = false;
            Ok(())
        }
    }

    fn spindle(dir: PinMock) -> SpindleAxis<Pwm, PinMock> {
        SpindleAxis::new(Pwm::default(), dir, PulseLimits::default(), SpindleConfig::default()).unwrap()
    }

    #[test]
    fn test_run_boundaries() {
        // inverted: forward drives DIR low
        let dir = PinMock::new(&[Transaction::set(State::Low)]);
        let mut probe = dir.clone();
        let mut axis = spindle(dir);

        let f = axis.run_rpm(100).unwrap();
        assert!((f - 100.0 * 22333.0 / 60.0).abs() < 0.1);
        assert_eq!(axis.run_rpm(6000).unwrap(), 375_000.0);
        assert_eq!(axis.rpm(), 6000);

        probe.done();
    }

    #[test]
    fn test_out_of_range_leaves_state() {
        let dir = PinMock::new(&[Transaction::set(State::Low)]);
        let mut probe = dir.clone();
        let mut axis = spindle(dir);
        axis.run_rpm(3500).unwrap();

        for rpm in [99, 6001, 0, -5, 70_000] {
            assert_eq!(
                axis.run_rpm(rpm),
                Err(Error::Command(CommandError::RpmOutOfRange { rpm, min: 100, max: 6000 }))
            );
        }
        assert_eq!(axis.rpm(), 3500);
        assert!(axis.is_running());

        probe.done();
    }

    #[test]
    fn test_stop_keeps_rpm() {
        let dir = PinMock::new(&[Transaction::set(State::Low)]);
        let mut probe = dir.clone();
        let mut axis = spindle(dir);

        axis.run_rpm(500).unwrap();
        axis.stop().unwrap();
        axis.stop().unwrap();

        assert!(!axis.is_running());
        assert!(!axis.output().enabled);
        assert_eq!(axis.rpm(), 500);
        assert_eq!(axis.frequency(), 0.0);

        probe.done();
    }
}
