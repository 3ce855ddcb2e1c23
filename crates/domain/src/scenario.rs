//! Scenarios: the data-driven test table.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::expectation::Expectation;
use crate::request::Endpoint;

/// One named (Endpoint, Expectation) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name within the suite; used as the test name in log records.
    pub name: String,
    /// Optional one-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The call to make.
    pub endpoint: Endpoint,
    /// What the response must look like.
    pub expectation: Expectation,
}

impl Scenario {
    /// Creates a scenario.
    #[must_use]
    pub fn new(name: impl Into<String>, endpoint: Endpoint, expectation: Expectation) -> Self {
        Self {
            name: name.into(),
            description: None,
            endpoint,
            expectation,
        }
    }
}

/// A named, ordered list of scenarios.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSuite {
    /// Suite name; also names the log file.
    pub suite: String,
    /// Scenarios in execution order.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl ScenarioSuite {
    /// Creates an empty suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            suite: name.into(),
            scenarios: Vec::new(),
        }
    }

    /// Adds a scenario (builder pattern).
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Finds a scenario by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Scenario names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.name.as_str())
    }

    /// Keeps only the named scenarios, preserving suite order.
    ///
    /// An empty filter keeps everything.
    #[must_use]
    pub fn filtered(&self, only: &[String]) -> Self {
        if only.is_empty() {
            return self.clone();
        }
        Self {
            suite: self.suite.clone(),
            scenarios: self
                .scenarios
                .iter()
                .filter(|s| only.iter().any(|o| o == &s.name))
                .cloned()
                .collect(),
        }
    }

    /// Returns true if the suite has no scenarios.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Get the number of scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Checks names are non-empty and unique and every expectation is well formed.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> DomainResult<()> {
        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if scenario.name.trim().is_empty() {
                return Err(DomainError::InvalidEndpoint(format!(
                    "scenario for {} has an empty name",
                    scenario.endpoint
                )));
            }
            if scenario.name.chars().any(char::is_control) {
                return Err(DomainError::InvalidEndpoint(format!(
                    "scenario name {:?} contains control characters",
                    scenario.name
                )));
            }
            if !seen.insert(scenario.name.as_str()) {
                return Err(DomainError::InvalidEndpoint(format!(
                    "duplicate scenario name `{}`",
                    scenario.name
                )));
            }
            scenario.expectation.validate()?;
        }
        Ok(())
    }
}
