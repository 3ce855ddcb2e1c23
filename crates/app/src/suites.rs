//! Suite selection.

use std::path::Path;

use apiprobe_domain::ScenarioSuite;
use apiprobe_infrastructure::{SerializationError, SuiteFormat, load_suite, parse_suite};

const STOREFRONT: &str = include_str!("../scenarios/storefront.yaml");

/// The built-in suite for the public storefront API.
///
/// # Errors
///
/// Returns an error only if the embedded YAML is malformed.
pub fn storefront() -> Result<ScenarioSuite, SerializationError> {
    parse_suite(STOREFRONT, SuiteFormat::Yaml)
}

/// Loads `path`, or the built-in suite when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn resolve(path: Option<&Path>) -> Result<ScenarioSuite, SerializationError> {
    match path {
        Some(path) => load_suite(path).await,
        None => storefront(),
    }
}
