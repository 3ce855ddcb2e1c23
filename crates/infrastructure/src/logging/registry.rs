//! Sink registry.
//!
//! Hands out one [`FileLogSink`] per suite. Asking for the same suite again
//! returns the existing handle, so a suite never ends up with two handlers
//! writing duplicate lines.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use apiprobe_application::ports::SinkError;

use super::FileLogSink;

/// Lazily opened file sinks keyed by destination.
#[derive(Debug)]
pub struct SinkRegistry {
    log_dir: PathBuf,
    console: bool,
    sinks: Mutex<HashMap<PathBuf, Arc<FileLogSink>>>,
}

impl SinkRegistry {
    /// Creates a registry writing under `log_dir`.
    #[must_use]
    pub fn new(log_dir: impl Into<PathBuf>, console: bool) -> Self {
        Self {
            log_dir: log_dir.into(),
            console,
            sinks: Mutex::new(HashMap::new()),
        }
    }

    /// Directory holding the log files.
    #[must_use]
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// File a suite logs to: `{log_dir}/{suite}.log`.
    #[must_use]
    pub fn path_for(&self, suite: &str) -> PathBuf {
        self.log_dir.join(format!("{}.log", file_stem(suite)))
    }

    /// Returns the sink for `suite`, opening it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened.
    pub fn attach(&self, suite: &str) -> Result<Arc<FileLogSink>, SinkError> {
        let path = self.path_for(suite);
        let mut sinks = self.sinks.lock().map_err(|_| SinkError::Poisoned)?;
        if let Some(existing) = sinks.get(&path) {
            return Ok(Arc::clone(existing));
        }
        let sink = Arc::new(FileLogSink::open(&path, self.console)?);
        sinks.insert(path, Arc::clone(&sink));
        Ok(sink)
    }

    /// Number of open sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.lock().map_or(0, |sinks| sinks.len())
    }

    /// Returns true if no sink has been attached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps suite names usable as file names.
fn file_stem(suite: &str) -> String {
    let stem: String = suite
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        "apiprobe".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use apiprobe_application::ports::LogSink;
    use apiprobe_domain::LogRecord;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attach_twice_returns_same_handle() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SinkRegistry::new(dir.path(), false);

        let first = registry.attach("api_tests").unwrap();
        let second = registry.attach("api_tests").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);

        first.append(&LogRecord::pass(Utc::now(), "once", 200, "")).unwrap();
        let content = std::fs::read_to_string(registry.path_for("api_tests")).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_separate_suites_get_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SinkRegistry::new(dir.path().join("logs"), false);

        let a = registry.attach("storefront").unwrap();
        let b = registry.attach("load_test").unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.path(), dir.path().join("logs").join("storefront.log"));
        assert!(registry.log_dir().exists());
    }

    #[test]
    fn test_file_stem_sanitizes() {
        assert_eq!(file_stem("store front/v1"), "store_front_v1");
        assert_eq!(file_stem("../etc"), "_etc");
        assert_eq!(file_stem("   "), "apiprobe");
    }
}
