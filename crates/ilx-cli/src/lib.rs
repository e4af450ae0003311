//! Command-line harness for the ilx metadata resolution engine.
//!
//! Loads a JSON program manifest, runs the whole-program resolution pass and
//! prints the report as text or JSON.

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
