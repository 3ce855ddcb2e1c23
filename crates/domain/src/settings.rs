//! Harness Settings
//!
//! Everything a run can be configured with. Every field has a default so a
//! partial config file or a handful of environment variables is enough.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::expectation::UnexpectedStatusPolicy;

/// Default base URL of the storefront API under test.
pub const DEFAULT_BASE_URL: &str = "https://automationexercise.com/api";

/// Load generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSettings {
    /// How many times the scenario is dispatched.
    #[serde(default = "default_iterations")]
    pub iterations: u64,
    /// Number of concurrent workers; 1 reproduces a serial loop.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            concurrency: default_concurrency(),
        }
    }
}

/// Settings for a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL every endpoint path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory holding one log file per suite.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Mirror every log record to the console.
    #[serde(default = "default_console")]
    pub console: bool,

    /// Policy for statuses an expectation does not declare.
    #[serde(default)]
    pub unexpected_status: UnexpectedStatusPolicy,

    /// Maximum characters of response body kept in a log record.
    #[serde(default = "default_snippet_len")]
    pub snippet_len: usize,

    /// Load generation settings.
    #[serde(default)]
    pub load: LoadSettings,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_console() -> bool {
    true
}

const fn default_snippet_len() -> usize {
    512
}

const fn default_iterations() -> u64 {
    10
}

const fn default_concurrency() -> usize {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            log_dir: default_log_dir(),
            timeout_ms: default_timeout_ms(),
            console: default_console(),
            unexpected_status: UnexpectedStatusPolicy::default(),
            snippet_len: default_snippet_len(),
            load: LoadSettings::default(),
        }
    }
}

impl Settings {
    /// Checks value ranges and that the base URL is an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSetting` naming the first bad key.
    pub fn validate(&self) -> DomainResult<()> {
        let url = Url::parse(&self.base_url).map_err(|e| DomainError::InvalidSetting {
            key: "base_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidSetting {
                key: "base_url",
                reason: format!("scheme must be http or https, got `{}`", url.scheme()),
            });
        }
        if self.timeout_ms == 0 {
            return Err(DomainError::InvalidSetting {
                key: "timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.load.concurrency == 0 {
            return Err(DomainError::InvalidSetting {
                key: "load.concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
