//! Mechanical constraints derived from positioning configuration.

use super::positioning::PositioningConfig;
use super::units::{Hertz, MM_PER_INCH};

/// Derived conversion factors computed from [`PositioningConfig`].
///
/// These are computed once at initialization and used for every move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MechanicalConstraints {
    /// Belt travel per pulley revolution in millimetres.
    pub circumference_mm: f32,

    /// Encoder counts per revolution (4x quadrature, calibrated).
    pub counts_per_revolution: f32,

    /// Travel per encoder count in inches.
    pub inches_per_count: f32,

    /// Driver steps per inch of travel (calibrated).
    pub steps_per_inch: f32,

    /// Position tolerance in inches.
    pub tolerance_in: f32,

    /// Position tolerance expressed in whole steps (truncated).
    pub tolerance_steps: i32,

    /// Maximum allowed encoder error in inches.
    pub max_error_in: f32,

    /// Step-rate floor in steps per second.
    pub min_step_rate: f32,
}

impl MechanicalConstraints {
    /// Compute mechanical constraints from positioning configuration.
    pub fn from_config(config: &PositioningConfig) -> Self {
        let mechanics = &config.mechanics;
        let control = &config.control;

        let circumference_mm = mechanics.belt_pitch_mm * mechanics.pulley_teeth as f32;

        let counts_per_revolution = mechanics.encoder_ppr as f32 * 4.0 * mechanics.calibration_scale;
        let inches_per_count = circumference_mm / counts_per_revolution / MM_PER_INCH;

        let steps_per_mm = mechanics.motor_steps_per_revolution as f32 * mechanics.calibration_scale
            / circumference_mm;
        let steps_per_inch = steps_per_mm * MM_PER_INCH;

        let tolerance_in = control.position_tolerance.0;
        let tolerance_steps = (tolerance_in * steps_per_inch) as i32;

        Self {
            circumference_mm,
            counts_per_revolution,
            inches_per_count,
            steps_per_inch,
            tolerance_in,
            tolerance_steps,
            max_error_in: control.max_position_error.0,
            min_step_rate: control.min_step_rate,
        }
    }

    /// Convert inches to steps (truncated toward zero).
    #[inline]
    pub fn inches_to_steps(&self, inches: f32) -> i32 {
        (inches * self.steps_per_inch) as i32
    }

    /// Convert steps to inches.
    #[inline]
    pub fn steps_to_inches(&self, steps: i32) -> f32 {
        steps as f32 / self.steps_per_inch
    }

    /// Convert encoder counts to inches.
    #[inline]
    pub fn counts_to_inches(&self, counts: i32) -> f32 {
        counts as f32 * self.inches_per_count
    }

    /// Step rate for a velocity in in/s, floored at `min_step_rate`.
    #[inline]
    pub fn step_rate(&self, velocity_in_per_sec: f32) -> f32 {
        let rate = velocity_in_per_sec * self.steps_per_inch;
        if rate.is_nan() || rate < self.min_step_rate {
            self.min_step_rate
        } else {
            rate
        }
    }

    /// Time between step pulses in microseconds for a velocity, never zero.
    #[inline]
    pub fn step_interval_us(&self, velocity_in_per_sec: f32) -> u32 {
        Hertz(self.step_rate(velocity_in_per_sec)).period_us().max(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let constraints = MechanicalConstraints::from_config(&PositioningConfig::default());

        // 15T x 10 mm = 150 mm/rev
        assert!((constraints.circumference_mm - 150.0).abs() < 1e-4);

        // 400 * 4 * 1.005324
        assert!((constraints.counts_per_revolution - 1608.518).abs() < 0.01);

        // ~0.00367 in/count
        assert!((constraints.inches_per_count - 0.003671).abs() < 1e-5);

        // 6400 * 1.005324 / 150 * 25.4
        assert!((constraints.steps_per_inch - 1089.50).abs() < 0.1);

        // 0.2 mm tolerance is 8 whole steps
        assert_eq!(constraints.tolerance_steps, 8);
    }

    #[test]
    fn test_step_rate_floor() {
        let constraints = MechanicalConstraints::from_config(&PositioningConfig::default());

        assert_eq!(constraints.step_rate(0.0), 10.0);
        assert_eq!(constraints.step_rate(0.001), 10.0);
        assert_eq!(constraints.step_interval_us(0.0), 100_000);

        // 0.0492 in/s is ~53.6 steps/s
        let rate = constraints.step_rate(0.0492);
        assert!((rate - 53.6).abs() < 0.1);
    }

    #[test]
    fn test_step_interval_never_zero() {
        let constraints = MechanicalConstraints::from_config(&PositioningConfig::default());
        assert!(constraints.step_interval_us(1.0e9) >= 2);
    }

    #[test]
    fn test_step_interval_is_step_period() {
        let constraints = MechanicalConstraints::from_config(&PositioningConfig::default());
        let rate = constraints.step_rate(0.5);
        assert_eq!(constraints.step_interval_us(0.5), Hertz(rate).period_us());
        assert_eq!(constraints.step_interval_us(0.5), 1835);
    }

    #[test]
    fn test_conversions() {
        let constraints = MechanicalConstraints::from_config(&PositioningConfig::default());
        let steps = constraints.inches_to_steps(12.5);
        assert_eq!(steps, (12.5 * constraints.steps_per_inch) as i32);
        assert!((constraints.steps_to_inches(steps) - 12.5).abs() < 0.001);
        assert_eq!(constraints.counts_to_inches(0), 0.0);
    }
}
