//! Example: Configuration-driven controller session.
//!
//! This example demonstrates how to:
//! - Load calibration for both controller variants from TOML
//! - Inspect the derived positioning geometry
//! - Drive the spindle + feed controller with protocol lines
//!
//! Run with: `cargo run --example config_driven --features std`

use axis_controller::{
    config::MechanicalConstraints,
    control::{FeedAxis, NotConnected, SpindleAxis},
    error::Result,
    parse_config, FrequencyController, PulseOutput,
};

/// Mock pulse generator that prints what it is asked to do.
struct MockPwm(&'static str);

impl PulseOutput for MockPwm {
    type Error = core::convert::Infallible;

    fn set_frequency(&mut self, hz: f32) -> core::result::Result<(), Self::Error> {
        println!("    [{}] frequency {:.1} Hz", self.0, hz);
        Ok(())
    }

    fn enable(&mut self) -> core::result::Result<(), Self::Error> {
        println!("    [{}] on", self.0);
        Ok(())
    }

    fn disable(&mut self) -> core::result::Result<(), Self::Error> {
        println!("    [{}] off", self.0);
        Ok(())
    }
}

/// Mock DIR pin for demonstration.
struct MockDirPin;

impl embedded_hal::digital::ErrorType for MockDirPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockDirPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Configuration-Driven Controller Example ===\n");

    // Every field is optional; omitted values keep their calibrated defaults.
    let toml_content = r#"
[frequency]
identity = "LATHE-A"
status_period_ms = 1000

[frequency.feed]
default_velocity_mm_per_sec = 60.0

[positioning]
identity = "LATHE-B"

[positioning.mechanics]
calibration_scale = 1.0

[positioning.control]
default_velocity_in_per_sec = 0.1
position_tolerance_in = 0.005
"#;

    let config = parse_config(toml_content)?;

    let constraints = MechanicalConstraints::from_config(config.positioning());
    println!("Positioning geometry:");
    println!("  Steps/inch: {:.3}", constraints.steps_per_inch);
    println!("  Inches/count: {:.6}", constraints.inches_per_count);
    println!(
        "  Tolerance: {:.4} in ({} steps)",
        constraints.tolerance_in, constraints.tolerance_steps
    );
    println!(
        "  Step interval at {:.2} in/s: {} us",
        config.positioning.control.default_velocity.0,
        constraints.step_interval_us(config.positioning.control.default_velocity.0)
    );
    println!();

    let frequency = config.frequency();
    let spindle = SpindleAxis::new(MockPwm("M1"), MockDirPin, frequency.pulse, frequency.spindle)?;
    let feed = FeedAxis::new(MockPwm("M2"), MockDirPin, NotConnected, frequency.pulse, frequency.feed)?;
    let mut controller = FrequencyController::new(frequency, spindle, feed, 0);

    println!("Session:");
    let mut out: Vec<String> = Vec::new();
    for line in ["I", "1r1200", "2f", "2v25", "2b", "?", "1r9000", "1s", "2s"] {
        println!("  > {}", line);
        for byte in line.bytes().chain(*b"\n") {
            controller.feed_byte(byte, &mut out);
        }
        for reply in out.drain(..) {
            println!("  < {}", reply);
        }
    }

    controller.poll(1000, &mut out);
    for reply in out.drain(..) {
        println!("  < {}", reply);
    }

    println!("\n=== Example Complete ===");

    Ok(())
}
