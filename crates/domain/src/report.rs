//! Run reports.
//!
//! Summaries produced by suite runs and load tests, serializable so the CLI
//! can write them next to the log files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of one scenario within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Whether the scenario passed.
    pub passed: bool,
    /// Response status, absent on transport failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure kind (`transport`, `body_decode`, `assertion`, `unexpected_status`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<String>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// True when the status was not declared but tolerated.
    #[serde(default)]
    pub unlisted: bool,
    /// Wall time for dispatch and evaluation in milliseconds.
    pub duration_ms: u64,
}

/// Results from running a scenario suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Identifier of this run.
    pub run_id: Uuid,
    /// Suite that was run.
    pub suite: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Individual scenario results.
    pub results: Vec<ScenarioReport>,
    /// Total number of scenarios.
    pub total: usize,
    /// Number of passed scenarios.
    pub passed: usize,
    /// Number of failed scenarios.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Create a new suite report.
    #[must_use]
    pub fn new(
        suite: impl Into<String>,
        started_at: DateTime<Utc>,
        results: Vec<ScenarioReport>,
        duration_ms: u64,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;

        Self {
            run_id: Uuid::now_v7(),
            suite: suite.into(),
            started_at,
            results,
            total,
            passed,
            failed,
            duration_ms,
        }
    }

    /// Check if all scenarios passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Results that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.results.iter().filter(|r| !r.passed)
    }
}

/// Latency summary in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Fastest sample.
    pub min_ms: f64,
    /// Arithmetic mean.
    pub mean_ms: f64,
    /// Median.
    pub p50_ms: f64,
    /// 95th percentile.
    pub p95_ms: f64,
    /// Slowest sample.
    pub max_ms: f64,
}

impl LatencyStats {
    /// Computes stats from unsorted samples. Empty input yields zeros.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let sum: f64 = sorted.iter().sum();
        Self {
            min_ms: sorted[0],
            mean_ms: sum / sorted.len() as f64,
            p50_ms: percentile(&sorted, 50.0),
            p95_ms: percentile(&sorted, 95.0),
            max_ms: sorted[sorted.len() - 1],
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted_values: &[f64], pct: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    let index = (((pct / 100.0) * sorted_values.len() as f64).ceil() as usize)
        .saturating_sub(1)
        .min(sorted_values.len() - 1);
    sorted_values[index]
}

/// Results from repeating one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    /// Identifier of this run.
    pub run_id: Uuid,
    /// Scenario that was repeated.
    pub scenario: String,
    /// Number of dispatched iterations.
    pub iterations: u64,
    /// Worker count used.
    pub concurrency: usize,
    /// Iterations whose expectation held.
    pub passed: u64,
    /// Iterations whose expectation failed.
    pub failed: u64,
    /// Iterations that never got a response.
    pub transport_errors: u64,
    /// Latency of iterations that got a response.
    pub latency: LatencyStats,
    /// Total wall time in milliseconds.
    pub wall_ms: u64,
}

impl LoadReport {
    /// Check if every iteration passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.transport_errors == 0
    }

    /// Completed iterations per second of wall time.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn throughput(&self) -> f64 {
        if self.wall_ms == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.wall_ms as f64 / 1000.0)
        }
    }
}
