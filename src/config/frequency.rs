//! Configuration of the frequency-controlled controller variant
//! (spindle M1 + feed M2).

use heapless::String;
use serde::Deserialize;

use super::units::{Hertz, MillimetersPerSec};

/// Bounds every programmed pulse frequency is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PulseLimits {
    /// Lowest frequency ever programmed into a pulse generator.
    #[serde(rename = "min_frequency_hz")]
    pub min_frequency: Hertz,

    /// Highest frequency ever programmed into a pulse generator.
    #[serde(rename = "max_frequency_hz")]
    pub max_frequency: Hertz,
}

impl Default for PulseLimits {
    fn default() -> Self {
        Self {
            min_frequency: Hertz(1.0),
            max_frequency: Hertz(375_000.0),
        }
    }
}

impl PulseLimits {
    /// Clamp a frequency into `[min_frequency, max_frequency]`.
    ///
    /// NaN maps to the minimum.
    #[inline]
    pub fn clamp(&self, hz: f32) -> f32 {
        if hz.is_nan() || hz < self.min_frequency.0 {
            self.min_frequency.0
        } else if hz > self.max_frequency.0 {
            self.max_frequency.0
        } else {
            hz
        }
    }
}

/// Spindle (M1) calibration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpindleConfig {
    /// Driver pulses per spindle revolution (calibrated).
    pub pulses_per_revolution: u32,

    /// Lowest accepted speed command.
    pub min_rpm: u16,

    /// Highest accepted speed command.
    pub max_rpm: u16,

    /// Invert direction pin logic.
    pub invert_direction: bool,
}

impl Default for SpindleConfig {
    fn default() -> Self {
        Self {
            pulses_per_revolution: 22_333,
            min_rpm: 100,
            max_rpm: 6_000,
            invert_direction: true,
        }
    }
}

impl SpindleConfig {
    /// Unclamped pulse frequency for a spindle speed.
    #[inline]
    pub fn frequency_for_rpm(&self, rpm: u16) -> f32 {
        rpm as f32 * self.pulses_per_revolution as f32 / 60.0
    }
}

/// Feed axis (M2) calibration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Driver steps per millimetre of feed travel.
    pub steps_per_mm: f32,

    /// Lowest accepted velocity command.
    #[serde(rename = "min_velocity_mm_per_sec")]
    pub min_velocity: MillimetersPerSec,

    /// Highest accepted velocity command.
    #[serde(rename = "max_velocity_mm_per_sec")]
    pub max_velocity: MillimetersPerSec,

    /// Velocity used when feeding before any velocity was set.
    #[serde(rename = "default_velocity_mm_per_sec")]
    pub default_velocity: MillimetersPerSec,

    /// Invert direction pin logic.
    pub invert_direction: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            // 5000 pulses/rev x 1.5 gear / 10 mm leadscrew
            steps_per_mm: 750.0,
            min_velocity: MillimetersPerSec(1.0),
            max_velocity: MillimetersPerSec(400.0),
            default_velocity: MillimetersPerSec(120.0),
            invert_direction: true,
        }
    }
}

impl FeedConfig {
    /// Unclamped pulse frequency for a feed velocity.
    #[inline]
    pub fn frequency_for_velocity(&self, mm_per_sec: f32) -> f32 {
        mm_per_sec * self.steps_per_mm
    }
}

/// Complete configuration of the frequency variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Name reported in the `ID:` response.
    pub identity: String<16>,

    /// Heartbeat telemetry period in milliseconds.
    pub status_period_ms: u32,

    /// Pulse frequency clamp.
    pub pulse: PulseLimits,

    /// Spindle calibration.
    pub spindle: SpindleConfig,

    /// Feed calibration.
    pub feed: FeedConfig,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            identity: String::try_from("ESP32A").unwrap_or_default(),
            status_period_ms: 1_000,
            pulse: PulseLimits::default(),
            spindle: SpindleConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}
