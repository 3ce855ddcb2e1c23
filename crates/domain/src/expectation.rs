//! Response expectations.
//!
//! An [`Expectation`] maps status codes to [`BodyPredicate`]s. Evaluating a
//! [`Response`] against it yields a [`Verdict`] or an [`ExpectationError`];
//! logging the outcome is left to the caller.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{DomainError, DomainResult};
use crate::json_path;
use crate::response::Response;

/// A check applied to the decoded JSON body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum BodyPredicate {
    /// No constraint; the body is not decoded.
    Any,
    /// The path must exist.
    HasKey {
        /// JSON path (e.g., "products" or "$.user.email").
        path: String,
    },
    /// The value at path must equal `value`.
    Equals {
        /// JSON path.
        path: String,
        /// Expected value.
        value: Value,
    },
    /// The string at path must contain `text`.
    Contains {
        /// JSON path.
        path: String,
        /// Substring to look for.
        text: String,
    },
    /// The string at path must match a regex.
    Matches {
        /// JSON path.
        path: String,
        /// Regex pattern.
        pattern: String,
    },
    /// Every nested predicate must hold.
    All {
        /// Nested predicates, checked in order.
        checks: Vec<BodyPredicate>,
    },
}

impl BodyPredicate {
    /// `HasKey` shorthand.
    #[must_use]
    pub fn has_key(path: impl Into<String>) -> Self {
        Self::HasKey { path: path.into() }
    }

    /// `Equals` shorthand.
    #[must_use]
    pub fn equals(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Exact match on the top-level `message` field.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::equals("message", Value::String(text.into()))
    }

    /// `Contains` shorthand.
    #[must_use]
    pub fn contains(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Contains {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Whether evaluating this predicate requires a JSON body.
    #[must_use]
    pub fn needs_body(&self) -> bool {
        match self {
            Self::Any => false,
            Self::All { checks } => checks.iter().any(Self::needs_body),
            _ => true,
        }
    }

    /// Get a human-readable description of this predicate.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Any => "any body".to_string(),
            Self::HasKey { path } => format!("'{path}' exists"),
            Self::Equals { path, value } => format!("'{path}' equals {value}"),
            Self::Contains { path, text } => format!("'{path}' contains '{text}'"),
            Self::Matches { path, pattern } => format!("'{path}' matches /{pattern}/"),
            Self::All { checks } => checks
                .iter()
                .map(Self::description)
                .collect::<Vec<_>>()
                .join(" and "),
        }
    }

    /// Checks that every path and pattern is well formed.
    ///
    /// # Errors
    ///
    /// Returns the first malformed path or pattern.
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            Self::Any => Ok(()),
            Self::HasKey { path } | Self::Equals { path, .. } | Self::Contains { path, .. } => {
                json_path::validate(path)
            }
            Self::Matches { path, pattern } => {
                json_path::validate(path)?;
                compile(pattern).map(|_| ())
            }
            Self::All { checks } => checks.iter().try_for_each(Self::validate),
        }
    }

    /// Applies the predicate to a decoded body.
    ///
    /// # Errors
    ///
    /// Returns a failure detail when the predicate does not hold.
    pub fn check(&self, body: &Value) -> Result<(), String> {
        match self {
            Self::Any => Ok(()),
            Self::HasKey { path } => find(body, path).map(|_| ()),
            Self::Equals { path, value } => {
                let actual = find(body, path)?;
                if actual == value {
                    Ok(())
                } else {
                    Err(format!("'{path}' expected {value}, got {actual}"))
                }
            }
            Self::Contains { path, text } => match find(body, path)? {
                Value::String(s) if s.contains(text.as_str()) => Ok(()),
                Value::String(s) => Err(format!("'{path}' = \"{s}\" does not contain '{text}'")),
                other => Err(format!("'{path}' is not a string: {other}")),
            },
            Self::Matches { path, pattern } => {
                let re = compile(pattern).map_err(|e| e.to_string())?;
                match find(body, path)? {
                    Value::String(s) if re.is_match(s) => Ok(()),
                    Value::String(s) => Err(format!("'{path}' = \"{s}\" does not match /{pattern}/")),
                    other => Err(format!("'{path}' is not a string: {other}")),
                }
            }
            Self::All { checks } => checks.iter().try_for_each(|c| c.check(body)),
        }
    }
}

fn find<'a>(body: &'a Value, path: &str) -> Result<&'a Value, String> {
    match json_path::lookup(body, path) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(format!("expected '{path}' not found in response")),
        Err(e) => Err(e.to_string()),
    }
}

fn compile(pattern: &str) -> DomainResult<Regex> {
    Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// What to do with a status code that has no registered predicate and is not tolerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnexpectedStatusPolicy {
    /// Pass and log the status as informational.
    #[default]
    Tolerate,
    /// Fail with [`ExpectationError::UnexpectedStatus`].
    Fail,
}

/// Declared mapping from status code to body predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Predicate per status code.
    #[serde(default)]
    pub rules: BTreeMap<u16, BodyPredicate>,
    /// Statuses accepted without any body check.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tolerated: BTreeSet<u16>,
    /// Per-scenario override of the suite-wide policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unexpected_status: Option<UnexpectedStatusPolicy>,
}

impl Expectation {
    /// Creates an empty expectation (every status is unexpected).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a predicate for a status code (builder pattern).
    #[must_use]
    pub fn on(mut self, status: u16, predicate: BodyPredicate) -> Self {
        self.rules.insert(status, predicate);
        self
    }

    /// Accepts a status without body checks (builder pattern).
    #[must_use]
    pub fn tolerate(mut self, status: u16) -> Self {
        self.tolerated.insert(status);
        self
    }

    /// Pins the unexpected-status policy for this expectation.
    #[must_use]
    pub const fn with_policy(mut self, policy: UnexpectedStatusPolicy) -> Self {
        self.unexpected_status = Some(policy);
        self
    }

    /// Every status code this expectation names, sorted.
    #[must_use]
    pub fn declared_statuses(&self) -> Vec<u16> {
        let mut statuses: BTreeSet<u16> = self.rules.keys().copied().collect();
        statuses.extend(self.tolerated.iter().copied());
        statuses.into_iter().collect()
    }

    /// Checks every predicate for malformed paths or patterns.
    ///
    /// # Errors
    ///
    /// Returns the first invalid predicate.
    pub fn validate(&self) -> DomainResult<()> {
        self.rules.values().try_for_each(BodyPredicate::validate)
    }

    /// Evaluates a response against this expectation.
    ///
    /// `default_policy` applies unless the expectation pins its own.
    ///
    /// # Errors
    ///
    /// Returns the reason the response did not meet the expectation.
    pub fn evaluate(
        &self,
        response: &Response,
        default_policy: UnexpectedStatusPolicy,
    ) -> Result<Verdict, ExpectationError> {
        let status = response.status;

        let Some(predicate) = self.rules.get(&status) else {
            if self.tolerated.contains(&status) {
                return Ok(Verdict::Accepted { status });
            }
            return match self.unexpected_status.unwrap_or(default_policy) {
                UnexpectedStatusPolicy::Tolerate => Ok(Verdict::Unlisted { status }),
                UnexpectedStatusPolicy::Fail => Err(ExpectationError::UnexpectedStatus {
                    status,
                    expected: self.declared_statuses(),
                }),
            };
        };

        if !predicate.needs_body() {
            return Ok(Verdict::Matched { status });
        }

        let body = response
            .json()
            .map_err(|e| ExpectationError::BodyDecode {
                status,
                reason: e.to_string(),
            })?;

        predicate
            .check(&body)
            .map(|()| Verdict::Matched { status })
            .map_err(|detail| ExpectationError::Assertion { status, detail })
    }
}

/// Successful evaluation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A registered predicate held.
    Matched {
        /// Response status.
        status: u16,
    },
    /// The status was in the tolerated set.
    Accepted {
        /// Response status.
        status: u16,
    },
    /// No rule for the status; passed under the lenient policy.
    Unlisted {
        /// Response status.
        status: u16,
    },
}

impl Verdict {
    /// Response status the verdict was reached for.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Matched { status } | Self::Accepted { status } | Self::Unlisted { status } => {
                *status
            }
        }
    }

    /// True when the status was not declared by the expectation.
    #[must_use]
    pub const fn is_unlisted(&self) -> bool {
        matches!(self, Self::Unlisted { .. })
    }
}

/// Why a response failed its expectation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExpectationError {
    /// The body was not valid JSON but the predicate needed it.
    #[error("body is not valid JSON (status {status}): {reason}")]
    BodyDecode {
        /// Response status.
        status: u16,
        /// Decoder message.
        reason: String,
    },

    /// The predicate did not hold.
    #[error("assertion failed (status {status}): {detail}")]
    Assertion {
        /// Response status.
        status: u16,
        /// Predicate failure detail.
        detail: String,
    },

    /// The status is outside the declared set under the strict policy.
    #[error("unexpected status code: {status} (expected one of {expected:?})")]
    UnexpectedStatus {
        /// Response status.
        status: u16,
        /// Declared statuses.
        expected: Vec<u16>,
    },
}

impl ExpectationError {
    /// Response status the failure was reached for.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::BodyDecode { status, .. }
            | Self::Assertion { status, .. }
            | Self::UnexpectedStatus { status, .. } => *status,
        }
    }

    /// Short machine-friendly kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BodyDecode { .. } => "body_decode",
            Self::Assertion { .. } => "assertion",
            Self::UnexpectedStatus { .. } => "unexpected_status",
        }
    }
}
