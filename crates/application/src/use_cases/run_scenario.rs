//! Run scenario use case.

use std::sync::Arc;
use std::time::Instant;

use apiprobe_domain::{ExpectationError, Response, Scenario, ScenarioReport, Verdict};
use thiserror::Error;

use crate::evaluator::ExpectationEvaluator;
use crate::ports::{HttpClient, TransportError};

/// Why a scenario failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScenarioError {
    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response was received but did not meet the expectation.
    #[error(transparent)]
    Expectation(#[from] ExpectationError),
}

impl ScenarioError {
    /// Short machine-readable failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Expectation(e) => e.kind(),
        }
    }

    /// Response status, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(_) => None,
            Self::Expectation(e) => Some(e.status()),
        }
    }
}

/// Outcome of one dispatch with its timing.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// The response, absent on transport failure.
    pub response: Option<Response>,
    /// Verdict or failure.
    pub result: Result<Verdict, ScenarioError>,
    /// Wall time for dispatch and evaluation.
    pub elapsed: std::time::Duration,
}

impl ScenarioOutcome {
    /// Converts the outcome into a report row.
    #[must_use]
    pub fn to_report(&self, name: &str) -> ScenarioReport {
        let duration_ms = u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX);
        match &self.result {
            Ok(verdict) => ScenarioReport {
                name: name.to_string(),
                passed: true,
                status: Some(verdict.status()),
                failure_kind: None,
                failure: None,
                unlisted: verdict.is_unlisted(),
                duration_ms,
            },
            Err(err) => ScenarioReport {
                name: name.to_string(),
                passed: false,
                status: err.status(),
                failure_kind: Some(err.kind().to_string()),
                failure: Some(err.to_string()),
                unlisted: false,
                duration_ms,
            },
        }
    }
}

/// Dispatches a scenario's endpoint and evaluates the response.
///
/// Every call writes exactly one log record through the evaluator's sink,
/// including when the request never got a response.
#[derive(Clone)]
pub struct RunScenario {
    client: Arc<dyn HttpClient>,
    evaluator: Arc<ExpectationEvaluator>,
}

impl RunScenario {
    /// Creates a new `RunScenario` use case.
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>, evaluator: Arc<ExpectationEvaluator>) -> Self {
        Self { client, evaluator }
    }

    /// Runs the scenario and returns its verdict.
    ///
    /// # Errors
    ///
    /// Returns a [`ScenarioError`] if the request failed or the response did
    /// not meet the expectation. The failure is already logged.
    pub async fn execute(&self, scenario: &Scenario) -> Result<Verdict, ScenarioError> {
        self.run(scenario).await.result
    }

    /// Runs the scenario and keeps the response and timing.
    pub async fn run(&self, scenario: &Scenario) -> ScenarioOutcome {
        let started = Instant::now();
        tracing::debug!(scenario = %scenario.name, endpoint = %scenario.endpoint, "dispatching");

        match self.client.execute(&scenario.endpoint).await {
            Ok(response) => {
                let result = self
                    .evaluator
                    .evaluate(&scenario.name, &response, &scenario.expectation)
                    .map_err(ScenarioError::from);
                ScenarioOutcome {
                    response: Some(response),
                    result,
                    elapsed: started.elapsed(),
                }
            }
            Err(err) => {
                self.evaluator.record_transport_failure(&scenario.name, &err);
                ScenarioOutcome {
                    response: None,
                    result: Err(ScenarioError::Transport(err)),
                    elapsed: started.elapsed(),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{FixedClock, RecordingSink, StubClient};
    use apiprobe_domain::{BodyPredicate, Endpoint, Expectation, Outcome};
    use pretty_assertions::assert_eq;

    fn scenario() -> Scenario {
        Scenario::new(
            "get_all_brands",
            Endpoint::get("brandsList").unwrap(),
            Expectation::new().on(200, BodyPredicate::has_key("brands")),
        )
    }

    fn use_case(client: StubClient, sink: &Arc<RecordingSink>) -> RunScenario {
        let evaluator = ExpectationEvaluator::new(sink.clone(), Arc::new(FixedClock::default()));
        RunScenario::new(Arc::new(client), Arc::new(evaluator))
    }

    #[tokio::test]
    async fn test_passing_scenario() {
        let sink = Arc::new(RecordingSink::default());
        let run = use_case(StubClient::always(200, r#"{"brands": []}"#), &sink);

        let verdict = run.execute(&scenario()).await.unwrap();

        assert_eq!(verdict, Verdict::Matched { status: 200 });
        assert_eq!(sink.records().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_logs_one_error() {
        let sink = Arc::new(RecordingSink::default());
        let client = StubClient::new(vec![Err(TransportError::ConnectionRefused {
            host: "127.0.0.1".to_string(),
            port: 9,
        })]);
        let run = use_case(client, &sink);

        let outcome = run.run(&scenario()).await;

        assert!(outcome.response.is_none());
        let err = outcome.result.clone().unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert_eq!(err.status(), None);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, Outcome::Fail);
        assert_eq!(records[0].status, None);

        let report = outcome.to_report("get_all_brands");
        assert!(!report.passed);
        assert_eq!(report.failure_kind.as_deref(), Some("transport"));
    }

    #[tokio::test]
    async fn test_assertion_failure_report() {
        let sink = Arc::new(RecordingSink::default());
        let run = use_case(StubClient::always(200, r#"{"message": "nope"}"#), &sink);

        let outcome = run.run(&scenario()).await;
        let report = outcome.to_report("get_all_brands");

        assert!(!report.passed);
        assert_eq!(report.status, Some(200));
        assert_eq!(report.failure_kind.as_deref(), Some("assertion"));
        assert_eq!(sink.records().len(), 1);
    }

    #[tokio::test]
    async fn test_unlisted_status_report() {
        let sink = Arc::new(RecordingSink::default());
        let run = use_case(StubClient::always(503, "down"), &sink);

        let report = run.run(&scenario()).await.to_report("get_all_brands");

        assert!(report.passed);
        assert!(report.unlisted);
        assert_eq!(report.status, Some(503));
    }
}
