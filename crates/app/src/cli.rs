//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use apiprobe_infrastructure::SettingsOverrides;

const LONG_ABOUT: &str = r"apiprobe runs declarative HTTP API scenarios and logs one record per request.

Each scenario is an endpoint plus the expected body per status code. Records
go to {log_dir}/{suite}.log and, unless --quiet, to the console.

EXAMPLES:
    # Run the built-in storefront suite
    apiprobe run

    # Run two scenarios from a custom suite against a local server
    apiprobe --base-url http://localhost:8080/api run --suite smoke.yaml \
        --only test_get_all_brands --only test_get_all_products

    # Hammer one scenario with 4 workers
    apiprobe load --scenario test_get_all_products --iterations 200 --concurrency 4";

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "apiprobe")]
#[command(author, version)]
#[command(about = "Black-box HTTP API test harness")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: ./apiprobe.{toml,yaml,json} if present)
    #[arg(short, long, global = true, env = "APIPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL endpoint paths are joined onto
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory for suite log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Fail on statuses a scenario does not declare
    #[arg(long, global = true)]
    pub strict: bool,

    /// Do not mirror records to the console
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Command-line layer of the settings.
    #[must_use]
    pub fn overrides(&self) -> SettingsOverrides {
        let (iterations, concurrency) = match &self.command {
            Command::Load(args) => (args.iterations, args.concurrency),
            Command::Run(_) | Command::List(_) => (None, None),
        };
        SettingsOverrides {
            base_url: self.base_url.clone(),
            log_dir: self.log_dir.clone(),
            timeout_ms: self.timeout_ms,
            strict: self.strict,
            quiet: self.quiet,
            iterations,
            concurrency,
        }
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a suite; exits non-zero if any scenario fails
    Run(RunArgs),

    /// Repeat one scenario, optionally with concurrent workers
    Load(LoadArgs),

    /// Print the scenario names of a suite
    List(SuiteArgs),
}

/// Where scenarios come from.
#[derive(Debug, Clone, Default, Args)]
pub struct SuiteArgs {
    /// Suite file (.yaml, .yml or .json); the built-in storefront suite if omitted
    #[arg(short, long)]
    pub suite: Option<PathBuf>,
}

/// Arguments of `apiprobe run`.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Suite selection.
    #[command(flatten)]
    pub suite: SuiteArgs,

    /// Only run the named scenario (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Write the run report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Arguments of `apiprobe load`.
#[derive(Debug, Clone, Default, Args)]
pub struct LoadArgs {
    /// Suite selection.
    #[command(flatten)]
    pub suite: SuiteArgs,

    /// Scenario to repeat
    #[arg(long)]
    pub scenario: String,

    /// Number of requests to send (default from settings)
    #[arg(short = 'n', long)]
    pub iterations: Option<u64>,

    /// Number of concurrent workers (default from settings)
    #[arg(short = 'C', long)]
    pub concurrency: Option<usize>,

    /// Write the load report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}
