//! Scenario suite files and report output.

use std::path::Path;

use apiprobe_domain::ScenarioSuite;
use serde::Serialize;
use tokio::fs;

use super::json::{SerializationError, from_json, to_json_stable};

/// On-disk suite format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl SuiteFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, SerializationError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(SerializationError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parses and validates a suite.
///
/// # Errors
///
/// Returns an error if the content does not parse or the suite is invalid.
pub fn parse_suite(content: &str, format: SuiteFormat) -> Result<ScenarioSuite, SerializationError> {
    let suite: ScenarioSuite = match format {
        SuiteFormat::Yaml => serde_yaml::from_str(content)?,
        SuiteFormat::Json => from_json(content)?,
    };
    suite.validate()?;
    Ok(suite)
}

/// Reads a suite file, choosing the parser by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_suite(path: &Path) -> Result<ScenarioSuite, SerializationError> {
    let format = SuiteFormat::from_path(path)?;
    let content = fs::read_to_string(path).await?;
    let suite = parse_suite(&content, format)?;
    tracing::debug!(path = %path.display(), scenarios = suite.len(), "loaded suite");
    Ok(suite)
}

/// Writes a report as stable JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_report<T: Serialize + Sync>(
    path: &Path,
    report: &T,
) -> Result<(), SerializationError> {
    let json = to_json_stable(report)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, json).await?;
    Ok(())
}
