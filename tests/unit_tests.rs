//! Unit test entry point; the suites live under `tests/unit/`.

mod unit;
