//! Unit types for physical quantities.
//!
//! Type-safe wrappers for the calibration values read from configuration, so
//! inches, millimetres and pulse rates cannot be mixed up at a call site.

use core::ops::Mul;

use serde::Deserialize;

/// Millimetres per inch.
pub const MM_PER_INCH: f32 = 25.4;

/// Linear position in inches.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f32);

impl Inches {
    /// Create from millimetres.
    #[inline]
    pub fn from_mm(mm: f32) -> Self {
        Self(mm / MM_PER_INCH)
    }
}

/// Linear velocity in inches per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct InchesPerSec(pub f32);

impl InchesPerSec {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Mul<f32> for InchesPerSec {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Linear velocity in millimetres per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct MillimetersPerSec(pub f32);

/// Pulse frequency in hertz.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Hertz(pub f32);

impl Hertz {
    /// Period of one cycle in microseconds, truncated.
    ///
    /// Returns `u32::MAX` for non-positive frequencies.
    #[inline]
    pub fn period_us(self) -> u32 {
        if self.0 > 0.0 {
            (1_000_000.0 / self.0) as u32
        } else {
            u32::MAX
        }
    }
}
