//! Configuration module for axis-controller.
//!
//! Calibration constants for both controller variants. Every field has a
//! compiled-in default; with the `std` feature the same structures can be
//! loaded from TOML.

mod frequency;
mod mechanical;
mod positioning;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use frequency::{FeedConfig, FrequencyConfig, PulseLimits, SpindleConfig};
pub use mechanical::MechanicalConstraints;
pub use positioning::{ControlConfig, MechanicsConfig, PositioningConfig};
pub use system::SystemConfig;
pub use validation::{validate_config, validate_frequency, validate_positioning};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Hertz, Inches, InchesPerSec, MillimetersPerSec};
