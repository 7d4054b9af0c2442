//! Unit test harness for axis-controller.
//!
//! This module organizes unit tests for each component of the library.

mod config_parsing;
mod config_validation;
mod properties;
mod protocol;
