//! apiprobe binary.

use std::process::ExitCode;

use apiprobe::{Cli, EXIT_ERROR, dispatch, telemetry};
use apiprobe_infrastructure::load_settings;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing();

    let settings = match load_settings(cli.config.as_deref(), cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    tracing::debug!("apiprobe v{}", env!("CARGO_PKG_VERSION"));
    dispatch(&cli, settings).await
}
