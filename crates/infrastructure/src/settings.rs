//! Settings loading.
//!
//! Sources, lowest priority first: built-in defaults, an optional
//! `apiprobe.{toml,yaml,json}` in the working directory (or an explicit
//! file), `APIPROBE__*` environment variables, then command-line overrides.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use apiprobe_domain::{DomainError, Settings, UnexpectedStatusPolicy};

/// Prefix for environment variables, e.g. `APIPROBE__BASE_URL`.
pub const ENV_PREFIX: &str = "APIPROBE";

/// Base name of the config file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "apiprobe";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// A source could not be read or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The merged settings are out of range.
    #[error("configuration validation error: {0}")]
    Validation(#[from] DomainError),
}

/// Values given on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `--base-url`
    pub base_url: Option<String>,
    /// `--log-dir`
    pub log_dir: Option<PathBuf>,
    /// `--timeout-ms`
    pub timeout_ms: Option<u64>,
    /// `--strict` forces the `fail` policy.
    pub strict: bool,
    /// `--quiet` disables the console mirror.
    pub quiet: bool,
    /// `--iterations`
    pub iterations: Option<u64>,
    /// `--concurrency`
    pub concurrency: Option<usize>,
}

impl SettingsOverrides {
    fn apply(&self, settings: &mut Settings) {
        if let Some(base_url) = &self.base_url {
            settings.base_url.clone_from(base_url);
        }
        if let Some(log_dir) = &self.log_dir {
            settings.log_dir.clone_from(log_dir);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            settings.timeout_ms = timeout_ms;
        }
        if self.strict {
            settings.unexpected_status = UnexpectedStatusPolicy::Fail;
        }
        if self.quiet {
            settings.console = false;
        }
        if let Some(iterations) = self.iterations {
            settings.load.iterations = iterations;
        }
        if let Some(concurrency) = self.concurrency {
            settings.load.concurrency = concurrency;
        }
    }
}

/// Builds [`Settings`] from layered sources.
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
    overrides: SettingsOverrides,
}

impl SettingsLoader {
    /// Loader with the default file lookup and the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads this file instead of looking for `apiprobe.*`; it must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Uses the given variables instead of the process environment.
    #[must_use]
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Applies command-line values on top of everything else.
    #[must_use]
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Merges all layers and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is out of range.
    pub fn load(&self) -> Result<Settings, ConfigLoadError> {
        let mut builder = config::Config::builder();

        builder = match &self.file {
            Some(path) => builder.add_source(config::File::from(path.as_path()).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(self.env.clone()),
        );

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        self.overrides.apply(&mut settings);
        settings.validate()?;

        tracing::debug!(
            base_url = %settings.base_url,
            log_dir = %settings.log_dir.display(),
            policy = ?settings.unexpected_status,
            "settings loaded"
        );
        Ok(settings)
    }
}

/// Loads settings from the default locations plus `overrides`.
///
/// # Errors
///
/// Returns an error if a source is malformed or a value is out of range.
pub fn load_settings(
    file: Option<&Path>,
    overrides: SettingsOverrides,
) -> Result<Settings, ConfigLoadError> {
    let mut loader = SettingsLoader::new().with_overrides(overrides);
    if let Some(path) = file {
        loader = loader.with_file(path);
    }
    loader.load()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use apiprobe_domain::DEFAULT_BASE_URL;
    use pretty_assertions::assert_eq;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "empty.toml", "");

        let settings = SettingsLoader::new()
            .with_file(path)
            .with_env(HashMap::new())
            .load()
            .unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "apiprobe.toml",
            r#"
base_url = "http://localhost:9000/api"
unexpected_status = "fail"

[load]
iterations = 50
"#,
        );

        let settings = SettingsLoader::new()
            .with_file(path)
            .with_env(HashMap::new())
            .load()
            .unwrap();

        assert_eq!(settings.base_url, "http://localhost:9000/api");
        assert_eq!(settings.unexpected_status, UnexpectedStatusPolicy::Fail);
        assert_eq!(settings.load.iterations, 50);
        assert_eq!(settings.load.concurrency, 1);
    }

    #[test]
    fn test_env_overrides_file_and_flags_override_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "apiprobe.yaml", "timeout_ms: 1000\nconsole: true\n");

        let settings = SettingsLoader::new()
            .with_file(path)
            .with_env(env(&[
                ("APIPROBE__TIMEOUT_MS", "2500"),
                ("APIPROBE__LOAD__CONCURRENCY", "4"),
                ("APIPROBE__BASE_URL", "http://env.example/api"),
            ]))
            .with_overrides(SettingsOverrides {
                base_url: Some("http://flag.example/api".to_string()),
                quiet: true,
                ..SettingsOverrides::default()
            })
            .load()
            .unwrap();

        assert_eq!(settings.timeout_ms, 2500);
        assert_eq!(settings.load.concurrency, 4);
        assert_eq!(settings.base_url, "http://flag.example/api");
        assert!(!settings.console);
    }

    #[test]
    fn test_strict_flag_sets_fail_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "c.toml", "");

        let settings = SettingsLoader::new()
            .with_file(path)
            .with_env(HashMap::new())
            .with_overrides(SettingsOverrides {
                strict: true,
                ..SettingsOverrides::default()
            })
            .load()
            .unwrap();

        assert_eq!(settings.unexpected_status, UnexpectedStatusPolicy::Fail);
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "c.toml", "timeout_ms = 0\n");

        let result = SettingsLoader::new()
            .with_file(path)
            .with_env(HashMap::new())
            .load();

        assert!(matches!(result, Err(ConfigLoadError::Validation(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SettingsLoader::new()
            .with_file(dir.path().join("nope.toml"))
            .with_env(HashMap::new())
            .load();

        assert!(matches!(result, Err(ConfigLoadError::Config(_))));
    }
}
