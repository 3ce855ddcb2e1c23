//! Log sinks for test outcome records.
//!
//! Every sink renders records with [`format_line`]:
//! `YYYY-MM-DD HH:MM:SS,mmm - LEVEL - message`.

mod file_sink;
mod memory_sink;
mod registry;

use apiprobe_domain::{LogLevel, LogRecord};

pub use file_sink::FileLogSink;
pub use memory_sink::MemoryLogSink;
pub use registry::SinkRegistry;

/// tracing target used when records are mirrored to the console.
pub const RECORD_TARGET: &str = "apiprobe::record";

/// Renders a record as one log line, without the trailing newline.
#[must_use]
pub fn format_line(record: &LogRecord) -> String {
    format!(
        "{} - {} - {}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
        record.level(),
        record.message()
    )
}

/// Emits a record as a tracing event at its own level.
pub(crate) fn mirror(record: &LogRecord) {
    let message = record.message();
    match record.level() {
        LogLevel::Info => tracing::info!(target: RECORD_TARGET, "{message}"),
        LogLevel::Error => tracing::error!(target: RECORD_TARGET, "{message}"),
    }
}
