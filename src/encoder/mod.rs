//! Quadrature encoder feedback.
//!
//! [`QuadratureDecoder`] runs in the edge interrupt and keeps the raw 4x
//! count. [`EncoderTracker`] runs in the cooperative loop and turns counts
//! into position and smoothed velocity.

mod quadrature;
mod tracker;

pub use quadrature::{decode, QuadratureDecoder, QUAD_TABLE};
pub use tracker::EncoderTracker;
