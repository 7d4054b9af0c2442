//! Unit tests for configuration validation.

use axis_controller::config::{
    validate_config, validate_frequency, validate_positioning, FrequencyConfig, PositioningConfig,
    SystemConfig,
};
use axis_controller::error::{ConfigError, Error};

/// Test validation of the default configuration.
#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&SystemConfig::default()).is_ok());
}

/// Test validation fails for an inverted rpm range.
#[test]
fn test_inverted_rpm_range() {
    let toml_str = r#"
[frequency.spindle]
min_rpm = 6000
max_rpm = 100
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidRange { field: "spindle rpm", .. }))
    ));
}

/// Test validation fails for a zero calibration ratio.
#[test]
fn test_zero_steps_per_mm() {
    let mut config = FrequencyConfig::default();
    config.feed.steps_per_mm = 0.0;

    let result = validate_frequency(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::NotPositive { field: "steps_per_mm", .. }))
    ));
}

/// Test validation fails for a default feed velocity outside its range.
#[test]
fn test_default_feed_velocity_outside_range() {
    let toml_str = r#"
[frequency.feed]
default_velocity_mm_per_sec = 500.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_err());
}

/// Test validation fails when the tolerance is not below the alarm threshold.
#[test]
fn test_tolerance_above_max_error() {
    let toml_str = r#"
[positioning.control]
position_tolerance_in = 0.3
max_position_error_in = 0.2
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::ToleranceExceedsMaxError { .. }))
    ));
}

/// Test validation of the correction fractions.
#[test]
fn test_correction_scale_fraction() {
    let mut config = PositioningConfig::default();
    config.control.correction_velocity_scale = 1.5;

    assert!(matches!(
        validate_positioning(&config),
        Err(Error::Config(ConfigError::InvalidFraction { .. }))
    ));
}

/// Test validation fails for a zero status period.
#[test]
fn test_zero_status_period() {
    let mut config = PositioningConfig::default();
    config.status_period_ms = 0;
    assert!(validate_positioning(&config).is_err());
}
