//! In-memory sink.

use std::sync::Mutex;

use apiprobe_application::ports::{LogSink, SinkError};
use apiprobe_domain::LogRecord;

use super::format_line;

/// Keeps records in memory; used when embedding the harness and in tests.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records appended so far.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Records rendered as log lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.records().iter().map(format_line).collect()
    }

    /// Number of records appended.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map_or(0, |records| records.len())
    }

    /// Returns true if nothing was appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemoryLogSink {
    fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(record.clone());
        Ok(())
    }

    fn destination(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collects_records_in_order() {
        let sink = MemoryLogSink::new();
        assert!(sink.is_empty());

        sink.append(&LogRecord::pass(Utc::now(), "one", 200, "")).unwrap();
        sink.append(&LogRecord::fail(Utc::now(), "two", Some(500), "", "bad"))
            .unwrap();

        let names: Vec<_> = sink.records().into_iter().map(|r| r.test_name).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(sink.len(), 2);
        assert!(sink.lines()[1].contains("ERROR"));
    }
}
