//! Append-only file sink.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use apiprobe_application::ports::{LogSink, SinkError};
use apiprobe_domain::LogRecord;

use super::{format_line, mirror};

/// Appends one line per record to a file, optionally mirroring to the console.
///
/// The file is opened in append mode and every record is written with a
/// single `write_all` under the lock, so concurrent callers never interleave.
#[derive(Debug)]
pub struct FileLogSink {
    path: PathBuf,
    file: Mutex<File>,
    console: bool,
}

impl FileLogSink {
    /// Opens (or creates) `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn open(path: impl Into<PathBuf>, console: bool) -> Result<Self, SinkError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!(path = %path.display(), "opened log file");
        Ok(Self {
            path,
            file: Mutex::new(file),
            console,
        })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether records are mirrored to the console.
    #[must_use]
    pub const fn console(&self) -> bool {
        self.console
    }
}

impl LogSink for FileLogSink {
    fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut line = format_line(record);
        line.push('\n');
        {
            let mut file = self.file.lock().map_err(|_| SinkError::Poisoned)?;
            file.write_all(line.as_bytes())?;
            file.flush()?;
        }
        if self.console {
            mirror(record);
        }
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}
