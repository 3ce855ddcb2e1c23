//! Log records: one structured entry per evaluated scenario.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pass/fail outcome of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The expectation held (or the status was tolerated).
    Pass,
    /// The expectation failed or the request never completed.
    Fail,
}

/// Severity written to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Passing outcomes, including informational unlisted statuses.
    Info,
    /// Failing outcomes.
    Error,
}

impl LogLevel {
    /// Upper-case label used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured, append-only entry for one test outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the outcome was decided.
    pub timestamp: DateTime<Utc>,
    /// Scenario name.
    pub test_name: String,
    /// Pass or fail.
    pub outcome: Outcome,
    /// Status code; `None` when the request never got a response.
    pub status: Option<u16>,
    /// Truncated response body.
    pub body_snippet: String,
    /// Failure detail, or the informational note for unlisted statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LogRecord {
    /// Creates a passing record.
    #[must_use]
    pub fn pass(
        timestamp: DateTime<Utc>,
        test_name: impl Into<String>,
        status: u16,
        body_snippet: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            test_name: test_name.into(),
            outcome: Outcome::Pass,
            status: Some(status),
            body_snippet: body_snippet.into(),
            detail: None,
        }
    }

    /// Creates a failing record.
    #[must_use]
    pub fn fail(
        timestamp: DateTime<Utc>,
        test_name: impl Into<String>,
        status: Option<u16>,
        body_snippet: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            test_name: test_name.into(),
            outcome: Outcome::Fail,
            status,
            body_snippet: body_snippet.into(),
            detail: Some(detail.into()),
        }
    }

    /// Attaches a detail note (builder pattern).
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Severity derived from the outcome.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        match self.outcome {
            Outcome::Pass => LogLevel::Info,
            Outcome::Fail => LogLevel::Error,
        }
    }

    /// Whether the record describes a passing outcome.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    /// The human-readable message part of a log line.
    #[must_use]
    pub fn message(&self) -> String {
        let status = self
            .status
            .map_or_else(|| "none".to_string(), |s| s.to_string());
        match self.outcome {
            Outcome::Pass => {
                let mut msg = format!(
                    "Test '{}' passed with status code: {status}",
                    self.test_name
                );
                if let Some(note) = &self.detail {
                    msg.push_str(" (");
                    msg.push_str(note);
                    msg.push(')');
                }
                msg.push_str(" | body: ");
                msg.push_str(&self.body_snippet);
                msg
            }
            Outcome::Fail => format!(
                "Error in {}: {} | status: {status} | body: {}",
                self.test_name,
                self.detail.as_deref().unwrap_or("unknown failure"),
                self.body_snippet
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap_or_default()
    }

    #[test]
    fn test_pass_message() {
        let record = LogRecord::pass(at(), "get_all_products", 200, r#"{"products":[]}"#);
        assert_eq!(record.level(), LogLevel::Info);
        assert_eq!(
            record.message(),
            r#"Test 'get_all_products' passed with status code: 200 | body: {"products":[]}"#
        );
    }

    #[test]
    fn test_unlisted_note_in_message() {
        let record = LogRecord::pass(at(), "teapot", 418, "").with_detail("unlisted status");
        assert!(record.message().contains("(unlisted status)"));
        assert!(record.passed());
    }

    #[test]
    fn test_fail_message_without_status() {
        let record = LogRecord::fail(at(), "login", None, "", "connection refused");
        assert_eq!(record.level(), LogLevel::Error);
        assert_eq!(
            record.message(),
            "Error in login: connection refused | status: none | body: "
        );
    }
}
