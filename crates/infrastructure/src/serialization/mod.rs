//! Serialization of scenario suites and run reports.
//!
//! Suites are read from YAML or JSON. Reports are written as deterministic
//! JSON: 2-space indentation and a trailing newline.

mod json;
mod suite;

pub use json::*;
pub use suite::{SuiteFormat, load_suite, parse_suite, write_report};
