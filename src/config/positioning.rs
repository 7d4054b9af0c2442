//! Configuration of the closed-loop positioning variant (M3).

use heapless::String;
use serde::Deserialize;

use super::units::{Inches, InchesPerSec};

/// Belt drive and encoder geometry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MechanicsConfig {
    /// Belt pitch in millimetres (T10 belt).
    pub belt_pitch_mm: f32,

    /// Pulley tooth count.
    pub pulley_teeth: u16,

    /// Scale factor from measured travel error, applied to steps and counts.
    pub calibration_scale: f32,

    /// Encoder pulses per revolution (before 4x quadrature).
    pub encoder_ppr: u16,

    /// Driver pulses per motor revolution.
    pub motor_steps_per_revolution: u32,

    /// Invert direction pin logic.
    pub invert_direction: bool,
}

impl Default for MechanicsConfig {
    fn default() -> Self {
        Self {
            belt_pitch_mm: 10.0,
            pulley_teeth: 15,
            calibration_scale: 1.005_324,
            encoder_ppr: 400,
            motor_steps_per_revolution: 6_400,
            invert_direction: false,
        }
    }
}

/// Closed-loop tuning.
///
/// Settle delay and correction velocity are calibration artifacts of one
/// mechanism; they are exposed here rather than fixed in code.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Velocity used until the host sets one.
    #[serde(rename = "default_velocity_in_per_sec")]
    pub default_velocity: InchesPerSec,

    /// Position tolerance for both the step engine and the encoder check.
    #[serde(rename = "position_tolerance_in")]
    pub position_tolerance: Inches,

    /// Encoder error above which the axis is aborted with an alarm.
    #[serde(rename = "max_position_error_in")]
    pub max_position_error: Inches,

    /// Wait between the end of a segment and the encoder check.
    pub correction_settle_ms: u32,

    /// Correction moves run at this fraction of the commanded velocity.
    pub correction_velocity_scale: f32,

    /// Floor for correction velocity so corrections always progress.
    #[serde(rename = "min_correction_velocity_in_per_sec")]
    pub min_correction_velocity: InchesPerSec,

    /// Correction moves allowed per request before alarming.
    pub max_correction_rounds: u8,

    /// Step-rate floor in steps per second.
    pub min_step_rate: f32,

    /// EMA smoothing factor for encoder velocity, in `(0, 1]`.
    pub velocity_smoothing: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            // ~1.25 mm/s, ~500 steps/s
            default_velocity: InchesPerSec(0.0492),
            position_tolerance: Inches::from_mm(0.2),
            max_position_error: Inches(0.200),
            correction_settle_ms: 50,
            correction_velocity_scale: 0.10,
            min_correction_velocity: InchesPerSec(0.005),
            max_correction_rounds: 8,
            min_step_rate: 10.0,
            velocity_smoothing: 0.30,
        }
    }
}

/// Complete configuration of the positioning variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PositioningConfig {
    /// Name reported in the `ID:` response.
    pub identity: String<16>,

    /// `POS` telemetry period in milliseconds.
    pub status_period_ms: u32,

    /// Run closed-loop corrections from encoder feedback.
    pub encoder_enabled: bool,

    /// Encoder reset button debounce in milliseconds.
    pub reset_debounce_ms: u32,

    /// Geometry.
    pub mechanics: MechanicsConfig,

    /// Tuning.
    pub control: ControlConfig,
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self {
            identity: String::try_from("ESP32B").unwrap_or_default(),
            status_period_ms: 100,
            encoder_enabled: true,
            reset_debounce_ms: 50,
            mechanics: MechanicsConfig::default(),
            control: ControlConfig::default(),
        }
    }
}
