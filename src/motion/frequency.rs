//! Frequency-mode pulse channel.

use crate::config::PulseLimits;
use crate::error::{HardwareError, Result};

use super::PulseOutput;

/// One continuously running pulse train.
///
/// Every frequency passes through [`PulseLimits::clamp`] before it reaches
/// the hardware.
pub struct FrequencyChannel<P: PulseOutput> {
    output: P,
    limits: PulseLimits,
    frequency_hz: f32,
    running: bool,
}

impl<P: PulseOutput> FrequencyChannel<P> {
    /// Wrap a pulse generator. The output is disabled immediately.
    pub fn new(mut output: P, limits: PulseLimits) -> Result<Self> {
        output.disable().map_err(|_| HardwareError::PulseOutput)?;
        Ok(Self {
            output,
            limits,
            frequency_hz: 0.0,
            running: false,
        })
    }

    /// Program `hz` (clamped) and make sure the train is running.
    ///
    /// When already running only the frequency changes; the train is not
    /// interrupted. Returns the frequency actually programmed.
    pub fn run(&mut self, hz: f32) -> Result<f32> {
        let clamped = self.limits.clamp(hz);
        if clamped != hz {
            debug!("pulse frequency clamped from {} to {}", hz, clamped);
        }

        self.output
            .set_frequency(clamped)
            .map_err(|_| HardwareError::PulseOutput)?;
        self.frequency_hz = clamped;

        if !self.running {
            self.output.enable().map_err(|_| HardwareError::PulseOutput)?;
            self.running = true;
        }

        Ok(clamped)
    }

    /// Re-program the frequency only if the train is running.
    ///
    /// Returns the new frequency, or `None` when stopped.
    pub fn retune(&mut self, hz: f32) -> Result<Option<f32>> {
        if self.running {
            self.run(hz).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Stop the train and hold the output low.
    pub fn stop(&mut self) -> Result<()> {
        // mark stopped first so a failing peripheral is never reported as running
        self.running = false;
        self.frequency_hz = 0.0;
        self.output.disable().map_err(|_| HardwareError::PulseOutput)?;
        Ok(())
    }

    /// Whether pulses are being produced.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last programmed frequency (0 when stopped).
    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    /// Frequency clamp in use.
    #[inline]
    pub fn limits(&self) -> &PulseLimits {
        &self.limits
    }

    /// Access the underlying generator.
    #[inline]
    pub fn output(&self) -> &P {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingPwm {
        frequencies: Vec<f32>,
        enables: u32,
        disables: u32,
        enabled: bool,
    }

    impl PulseOutput for RecordingPwm {
        type Error = core::convert::Infallible;

        fn set_frequency(&mut self, hz: f32) -> core::result::Result<(), Self::Error> {
            self.frequencies.push(hz);
            Ok(())
        }

        fn enable(&mut self) -> core::result::Result<(), Self::Error> {
            self.enables += 1;
            self.enabled = true;
            Ok(())
        }

        fn disable(&mut self) -> core::result::Result<(), Self::Error> {
            self.disables += 1;
            self.enabled = false;
            Ok(())
        }
    }

    #[test]
    fn test_new_holds_output_low() {
        let channel = FrequencyChannel::new(RecordingPwm::default(), PulseLimits::default()).unwrap();
        assert!(!channel.is_running());
        assert_eq!(channel.output().disables, 1);
        assert!(!channel.output().enabled);
    }

    #[test]
    fn test_run_clamps_and_enables_once() {
        let mut channel =
            FrequencyChannel::new(RecordingPwm::default(), PulseLimits::default()).unwrap();

        assert_eq!(channel.run(90_000.0).unwrap(), 90_000.0);
        assert_eq!(channel.run(2_000_000.0).unwrap(), 375_000.0);

        // live retune does not restart the train
        assert_eq!(channel.output().enables, 1);
        assert_eq!(channel.output().frequencies, vec![90_000.0, 375_000.0]);
        assert!(channel.is_running());
    }

    #[test]
    fn test_retune_only_when_running() {
        let mut channel =
            FrequencyChannel::new(RecordingPwm::default(), PulseLimits::default()).unwrap();

        assert_eq!(channel.retune(1000.0).unwrap(), None);
        assert!(channel.output().frequencies.is_empty());

        channel.run(500.0).unwrap();
        assert_eq!(channel.retune(1000.0).unwrap(), Some(1000.0));
    }

    #[test]
    fn test_stop() {
        let mut channel =
            FrequencyChannel::new(RecordingPwm::default(), PulseLimits::default()).unwrap();
        channel.run(500.0).unwrap();
        channel.stop().unwrap();

        assert!(!channel.is_running());
        assert_eq!(channel.frequency(), 0.0);
        assert!(!channel.output().enabled);
    }
}
