//! System configuration - root configuration structure.

use serde::Deserialize;

use super::frequency::FrequencyConfig;
use super::positioning::PositioningConfig;

/// Root configuration structure from TOML.
///
/// Every table and field is optional; anything left out takes the
/// compiled-in calibration value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Spindle + feed controller variant.
    pub frequency: FrequencyConfig,

    /// Closed-loop positioning controller variant.
    pub positioning: PositioningConfig,
}

impl SystemConfig {
    /// Configuration of the frequency variant.
    pub fn frequency(&self) -> &FrequencyConfig {
        &self.frequency
    }

    /// Configuration of the positioning variant.
    pub fn positioning(&self) -> &PositioningConfig {
        &self.positioning
    }
}
