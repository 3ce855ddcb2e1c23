//! Expectation Evaluator
//!
//! Classifies a response by status code, checks its body against the
//! declared expectation and writes exactly one log record per evaluation,
//! whatever the outcome.

use std::sync::Arc;

use apiprobe_domain::{
    Expectation, ExpectationError, LogRecord, Response, UnexpectedStatusPolicy, Verdict,
};

use crate::ports::{Clock, LogSink, TransportError};

/// Default number of body characters kept in a record.
pub const DEFAULT_SNIPPET_LEN: usize = 512;

/// Evaluates responses and reports every outcome to a sink.
pub struct ExpectationEvaluator {
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
    policy: UnexpectedStatusPolicy,
    snippet_len: usize,
}

impl ExpectationEvaluator {
    /// Creates an evaluator with the lenient policy.
    pub fn new(sink: Arc<dyn LogSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sink,
            clock,
            policy: UnexpectedStatusPolicy::default(),
            snippet_len: DEFAULT_SNIPPET_LEN,
        }
    }

    /// Sets the policy for undeclared statuses.
    #[must_use]
    pub const fn with_policy(mut self, policy: UnexpectedStatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets how much of the body goes into each record.
    #[must_use]
    pub const fn with_snippet_len(mut self, snippet_len: usize) -> Self {
        self.snippet_len = snippet_len;
        self
    }

    /// Policy applied to undeclared statuses.
    #[must_use]
    pub const fn policy(&self) -> UnexpectedStatusPolicy {
        self.policy
    }

    /// Evaluates `response` against `expectation` and logs the outcome.
    ///
    /// # Errors
    ///
    /// Returns the expectation failure after it has been logged.
    pub fn evaluate(
        &self,
        test_name: &str,
        response: &Response,
        expectation: &Expectation,
    ) -> Result<Verdict, ExpectationError> {
        let result = expectation.evaluate(response, self.policy);
        let record = self.record_for(test_name, response, &result);
        self.emit(&record);
        result
    }

    /// Logs a request that never produced a response.
    pub fn record_transport_failure(&self, test_name: &str, error: &TransportError) {
        let record = LogRecord::fail(self.clock.now(), test_name, None, "", error.to_string());
        self.emit(&record);
    }

    fn record_for(
        &self,
        test_name: &str,
        response: &Response,
        result: &Result<Verdict, ExpectationError>,
    ) -> LogRecord {
        let now = self.clock.now();
        let snippet = response.snippet(self.snippet_len);
        match result {
            Ok(verdict) if verdict.is_unlisted() => {
                LogRecord::pass(now, test_name, verdict.status(), snippet).with_detail(format!(
                    "unlisted status {} tolerated",
                    response.status_code()
                ))
            }
            Ok(verdict) => LogRecord::pass(now, test_name, verdict.status(), snippet),
            Err(err) => LogRecord::fail(now, test_name, Some(err.status()), snippet, err.to_string()),
        }
    }

    fn emit(&self, record: &LogRecord) {
        if let Err(e) = self.sink.append(record) {
            tracing::warn!(
                sink = %self.sink.destination(),
                test = %record.test_name,
                error = %e,
                "failed to write log record"
            );
        }
    }
}

impl std::fmt::Debug for ExpectationEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpectationEvaluator")
            .field("sink", &self.sink.destination())
            .field("policy", &self.policy)
            .field("snippet_len", &self.snippet_len)
            .finish_non_exhaustive()
    }
}
