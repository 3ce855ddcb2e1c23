//! apiprobe - black-box HTTP API test harness
//!
//! The binary wires the layers together: settings from `config`, the
//! reqwest adapter, one log file per suite, and the run/load/list commands.

pub mod cli;
pub mod commands;
pub mod error;
pub mod suites;
pub mod telemetry;

pub use cli::Cli;
pub use commands::{EXIT_ERROR, EXIT_FAILED, EXIT_PASSED, Harness, dispatch, exit_status};
pub use error::CliError;
