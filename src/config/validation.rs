//! Configuration validation.

use crate::error::{ConfigError, Result};

use super::{FrequencyConfig, PositioningConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Calibration ratios and rates are strictly positive
/// - Every `[min, max]` range has `min < max`
/// - Position tolerance is smaller than the maximum allowed error
/// - Smoothing and correction-scale fractions lie in `(0, 1]`
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_frequency(&config.frequency)?;
    validate_positioning(&config.positioning)?;
    Ok(())
}

/// Validate the frequency variant on its own.
pub fn validate_frequency(config: &FrequencyConfig) -> Result<()> {
    positive("status_period_ms", config.status_period_ms as f32)?;

    let pulse = &config.pulse;
    positive("min_frequency_hz", pulse.min_frequency.0)?;
    range("pulse frequency", pulse.min_frequency.0, pulse.max_frequency.0)?;

    let spindle = &config.spindle;
    positive("pulses_per_revolution", spindle.pulses_per_revolution as f32)?;
    range("spindle rpm", spindle.min_rpm as f32, spindle.max_rpm as f32)?;

    let feed = &config.feed;
    positive("steps_per_mm", feed.steps_per_mm)?;
    positive("min_velocity_mm_per_sec", feed.min_velocity.0)?;
    range("feed velocity", feed.min_velocity.0, feed.max_velocity.0)?;
    if feed.default_velocity.0 < feed.min_velocity.0 || feed.default_velocity.0 > feed.max_velocity.0 {
        return Err(ConfigError::InvalidRange {
            field: "default feed velocity",
            min: feed.min_velocity.0,
            max: feed.max_velocity.0,
        }
        .into());
    }

    Ok(())
}

/// Validate the positioning variant on its own.
pub fn validate_positioning(config: &PositioningConfig) -> Result<()> {
    positive("status_period_ms", config.status_period_ms as f32)?;

    let mechanics = &config.mechanics;
    positive("belt_pitch_mm", mechanics.belt_pitch_mm)?;
    positive("pulley_teeth", mechanics.pulley_teeth as f32)?;
    positive("calibration_scale", mechanics.calibration_scale)?;
    positive("encoder_ppr", mechanics.encoder_ppr as f32)?;
    positive("motor_steps_per_revolution", mechanics.motor_steps_per_revolution as f32)?;

    let control = &config.control;
    positive("default_velocity_in_per_sec", control.default_velocity.0)?;
    positive("position_tolerance_in", control.position_tolerance.0)?;
    positive("min_correction_velocity_in_per_sec", control.min_correction_velocity.0)?;
    positive("min_step_rate", control.min_step_rate)?;
    if control.position_tolerance.0 >= control.max_position_error.0 {
        return Err(ConfigError::ToleranceExceedsMaxError {
            tolerance: control.position_tolerance.0,
            max_error: control.max_position_error.0,
        }
        .into());
    }
    fraction("correction_velocity_scale", control.correction_velocity_scale)?;
    fraction("velocity_smoothing", control.velocity_smoothing)?;

    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    // written so NaN fails too
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value }.into())
    }
}

fn range(field: &'static str, min: f32, max: f32) -> Result<()> {
    if min < max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { field, min, max }.into())
    }
}

fn fraction(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFraction { field, value }.into())
    }
}
