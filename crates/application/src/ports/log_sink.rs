//! Log sink port

use apiprobe_domain::LogRecord;
use thiserror::Error;

/// Failure to persist a record.
#[derive(Debug, Error)]
pub enum SinkError {
    /// IO error while appending.
    #[error("failed to append log record: {0}")]
    Io(#[from] std::io::Error),

    /// The sink's lock was poisoned by a panicking writer.
    #[error("log sink is poisoned")]
    Poisoned,
}

/// Append-only destination for [`LogRecord`]s.
///
/// `append` must write each record atomically: concurrent callers never
/// interleave partial records.
pub trait LogSink: Send + Sync {
    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn append(&self, record: &LogRecord) -> Result<(), SinkError>;

    /// Human-readable destination (file path, "memory", ...).
    fn destination(&self) -> String;
}
