//! # axis-controller
//!
//! Interrupt-driven stepper axis control with quadrature closed-loop
//! correction and a line-based serial command protocol, on embedded-hal 1.0.
//!
//! ## Features
//!
//! - **Two controller variants**: a frequency-controlled spindle + feed pair,
//!   and a closed-loop positioning axis
//! - **Interrupt-safe**: step engine and quadrature decoder are `const`
//!   constructible, live in `static`s and share state through
//!   `critical-section`
//! - **Closed-loop correction**: bounded, non-blocking settle/correct cycle
//!   with alarms on excessive error
//! - **no_std compatible**: core library works without standard library
//! - **Configuration-driven**: calibration constants have compiled-in
//!   defaults and can be loaded from TOML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axis_controller::control::{ClosedLoopController, NotConnected, ResetButton};
//! use axis_controller::{PositioningController, QuadratureDecoder, StepEngine, SystemConfig};
//!
//! static ENGINE: StepEngine<StepPin> = StepEngine::new();
//! static ENCODER: QuadratureDecoder = QuadratureDecoder::new();
//!
//! // timer interrupt: ENGINE.on_tick();
//! // encoder edge interrupt: ENCODER.on_edge(a, b);
//!
//! let config = SystemConfig::default();
//! ENGINE.attach(step_pin)?;
//! let axis = ClosedLoopController::new(
//!     &ENGINE, &ENCODER, dir_pin, NotConnected, tick_timer, &config.positioning, millis(),
//! )?;
//! let button = ResetButton::new(reset_pin, config.positioning.reset_debounce_ms, millis())?;
//! let mut controller = PositioningController::new(&config.positioning, axis, button, millis());
//!
//! loop {
//!     while let Some(byte) = uart.read() {
//!         controller.feed_byte(byte, millis(), &mut tx_queue);
//!     }
//!     controller.poll(millis(), &mut tx_queue);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the macros are visible in every module
#[macro_use]
mod log;

// Core modules
pub mod config;
pub mod control;
pub mod controller;
pub mod encoder;
pub mod error;
pub mod motion;
pub mod protocol;
pub mod status;

// Re-exports for ergonomic API
pub use config::{validate_config, FrequencyConfig, MechanicalConstraints, PositioningConfig, SystemConfig};
pub use controller::{FrequencyController, PositioningController};
pub use encoder::{EncoderTracker, QuadratureDecoder};
pub use error::{Error, ErrorKind, Result};
pub use motion::{Direction, FrequencyChannel, PulseOutput, StepEngine, TickTimer};
pub use protocol::{LineWriter, Response, TransportError};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Hertz, Inches, InchesPerSec, MillimetersPerSec};
