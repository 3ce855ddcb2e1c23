//! Run suite use case.

use std::sync::Arc;
use std::time::Instant;

use apiprobe_domain::{ScenarioSuite, SuiteReport};

use super::RunScenario;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::Clock;

/// Runs every scenario of a suite in order, one at a time.
pub struct RunSuite {
    runner: RunScenario,
    clock: Arc<dyn Clock>,
}

impl RunSuite {
    /// Creates a new `RunSuite` use case.
    #[must_use]
    pub fn new(runner: RunScenario, clock: Arc<dyn Clock>) -> Self {
        Self { runner, clock }
    }

    /// Runs the suite, restricted to `only` when it is non-empty.
    ///
    /// Each scenario finishes dispatch, evaluation and logging before the
    /// next one starts. Scenario failures are collected, never raised.
    ///
    /// # Errors
    ///
    /// Returns an error if the suite is invalid or `only` names a scenario
    /// the suite does not have.
    pub async fn execute(
        &self,
        suite: &ScenarioSuite,
        only: &[String],
    ) -> ApplicationResult<SuiteReport> {
        suite.validate()?;
        if let Some(missing) = only.iter().find(|name| suite.find(name).is_none()) {
            return Err(ApplicationError::NotFound(format!(
                "scenario `{missing}` in suite `{}`",
                suite.suite
            )));
        }

        let selected = suite.filtered(only);
        let started_at = self.clock.now();
        let started = Instant::now();
        let mut results = Vec::with_capacity(selected.len());

        for scenario in &selected.scenarios {
            let outcome = self.runner.run(scenario).await;
            results.push(outcome.to_report(&scenario.name));
        }

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let report = SuiteReport::new(selected.suite.clone(), started_at, results, duration_ms);
        tracing::info!(
            suite = %report.suite,
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            "suite finished"
        );
        Ok(report)
    }
}
