//! Unit tests for TOML configuration parsing.

use axis_controller::config::{load_config, parse_config, MechanicalConstraints, SystemConfig};
use axis_controller::error::{ConfigError, Error};

/// Test that an empty file yields the calibrated defaults.
#[test]
fn test_empty_config_uses_defaults() {
    let config: SystemConfig = toml::from_str("").expect("Failed to parse TOML");

    assert_eq!(config.frequency.identity.as_str(), "ESP32A");
    assert_eq!(config.frequency.spindle.pulses_per_revolution, 22_333);
    assert_eq!(config.frequency.feed.steps_per_mm, 750.0);
    assert_eq!(config.frequency.pulse.max_frequency.0, 375_000.0);

    assert_eq!(config.positioning.identity.as_str(), "ESP32B");
    assert_eq!(config.positioning.status_period_ms, 100);
    assert_eq!(config.positioning.mechanics.pulley_teeth, 15);
    assert_eq!(config.positioning.mechanics.encoder_ppr, 400);
    assert_eq!(config.positioning.control.correction_settle_ms, 50);
    assert!(config.positioning.encoder_enabled);
}

/// Test parsing a full frequency-variant section.
#[test]
fn test_parse_frequency_section() {
    let toml_str = r#"
[frequency]
identity = "LATHE"
status_period_ms = 500

[frequency.pulse]
min_frequency_hz = 5.0
max_frequency_hz = 200000.0

[frequency.spindle]
pulses_per_revolution = 20000
min_rpm = 50
max_rpm = 3000
invert_direction = false

[frequency.feed]
steps_per_mm = 400.0
min_velocity_mm_per_sec = 2.0
max_velocity_mm_per_sec = 250.0
default_velocity_mm_per_sec = 60.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let frequency = &config.frequency;

    assert_eq!(frequency.identity.as_str(), "LATHE");
    assert_eq!(frequency.status_period_ms, 500);
    assert_eq!(frequency.pulse.min_frequency.0, 5.0);
    assert_eq!(frequency.pulse.max_frequency.0, 200_000.0);
    assert_eq!(frequency.spindle.max_rpm, 3000);
    assert!(!frequency.spindle.invert_direction);
    assert_eq!(frequency.feed.default_velocity.0, 60.0);
}

/// Test parsing positioning mechanics and deriving constraints from them.
#[test]
fn test_parse_positioning_mechanics() {
    let toml_str = r#"
[positioning.mechanics]
belt_pitch_mm = 5.0
pulley_teeth = 20
calibration_scale = 1.0
encoder_ppr = 1000
motor_steps_per_revolution = 3200

[positioning.control]
position_tolerance_in = 0.002
max_position_error_in = 0.1
max_correction_rounds = 3
"#;

    let config = parse_config(toml_str).expect("Failed to parse config");
    let constraints = MechanicalConstraints::from_config(&config.positioning);

    // 20T x 5 mm = 100 mm per revolution
    assert!((constraints.circumference_mm - 100.0).abs() < 1e-4);
    assert!((constraints.counts_per_revolution - 4000.0).abs() < 1e-3);
    assert!((constraints.steps_per_inch - 3200.0 / 100.0 * 25.4).abs() < 0.01);
    assert_eq!(constraints.tolerance_steps, 1);
    assert_eq!(config.positioning.control.max_correction_rounds, 3);
}

/// Test that a wrongly typed value is rejected during parsing.
#[test]
fn test_wrong_type_rejected() {
    let toml_str = r#"
[positioning]
encoder_enabled = "yes"
"#;

    let result = parse_config(toml_str);
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test that an over-long identity does not fit the fixed-capacity string.
#[test]
fn test_identity_capacity() {
    let toml_str = r#"
[frequency]
identity = "A-VERY-LONG-CONTROLLER-NAME"
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err(), "Should reject identity longer than 16 bytes");
}

/// Test loading from a file on disk.
#[test]
fn test_load_config_file() {
    let path = std::env::temp_dir().join("axis_controller_load_test.toml");
    std::fs::write(&path, "[positioning]\nencoder_enabled = false\n").expect("write temp file");

    let config = load_config(&path).expect("Failed to load config");
    assert!(!config.positioning.encoder_enabled);

    let _ = std::fs::remove_file(&path);
}
