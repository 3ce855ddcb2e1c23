//! CLI error type.

use apiprobe_application::ApplicationError;
use apiprobe_application::ports::{SinkError, TransportError};
use apiprobe_infrastructure::{ConfigLoadError, SerializationError};
use thiserror::Error;

/// Anything that stops a command before it can report results.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    /// A suite could not be loaded or a report written.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The HTTP client could not be built.
    #[error("cannot create HTTP client: {0}")]
    Client(#[from] TransportError),

    /// The log file could not be opened.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// A use case failed.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The summary could not be written.
    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}
