//! apiprobe Application - Harness orchestration
//!
//! This crate wires the domain types to the outside world through ports:
//! the Expectation Evaluator, and the scenario, suite and load use cases.

pub mod error;
pub mod evaluator;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod testing;

pub use error::{ApplicationError, ApplicationResult};
pub use evaluator::{DEFAULT_SNIPPET_LEN, ExpectationEvaluator};
pub use use_cases::{LoadTest, RunScenario, RunSuite, ScenarioError, ScenarioOutcome};
