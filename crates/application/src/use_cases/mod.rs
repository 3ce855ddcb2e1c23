//! Application use cases (harness orchestration).

mod run_scenario;
mod run_suite;

pub use load_test::LoadTest;
pub use run_scenario::{RunScenario, ScenarioError, ScenarioOutcome};
pub use run_suite::RunSuite;
