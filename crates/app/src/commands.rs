//! Command handlers.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use apiprobe_application::ports::{Clock, HttpClient, LogSink};
use apiprobe_application::{ApplicationError, ExpectationEvaluator, LoadTest, RunScenario, RunSuite};
use apiprobe_domain::{LoadReport, Settings, SuiteReport};
use apiprobe_infrastructure::{ReqwestHttpClient, SinkRegistry, SystemClock, write_report};

use crate::cli::{Cli, Command, LoadArgs, RunArgs, SuiteArgs};
use crate::error::CliError;
use crate::suites;

/// Log file stem used by load tests.
pub const LOAD_LOG: &str = "load_test";

/// Exit code when every scenario passed.
pub const EXIT_PASSED: u8 = 0;
/// Exit code when at least one scenario failed.
pub const EXIT_FAILED: u8 = 1;
/// Exit code when the command could not run at all.
pub const EXIT_ERROR: u8 = 2;

/// Shared wiring for every command.
pub struct Harness {
    settings: Settings,
    client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    registry: SinkRegistry,
    sink: Option<Arc<dyn LogSink>>,
}

impl Harness {
    /// Builds the HTTP client and sink registry from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: Settings) -> Result<Self, CliError> {
        let client = ReqwestHttpClient::new(&settings.base_url, settings.timeout_ms)?;
        Ok(Self::with_parts(
            settings,
            Arc::new(client),
            Arc::new(SystemClock::new()),
        ))
    }

    /// Builds a harness around existing ports.
    #[must_use]
    pub fn with_parts(settings: Settings, client: Arc<dyn HttpClient>, clock: Arc<dyn Clock>) -> Self {
        let registry = SinkRegistry::new(&settings.log_dir, settings.console);
        Self {
            settings,
            client,
            clock,
            registry,
            sink: None,
        }
    }

    /// Sends every record to `sink` instead of the per-suite log files.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Effective settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Sink registry used for log files.
    #[must_use]
    pub const fn registry(&self) -> &SinkRegistry {
        &self.registry
    }

    fn runner(&self, log_name: &str) -> Result<RunScenario, CliError> {
        let sink: Arc<dyn LogSink> = match &self.sink {
            Some(sink) => Arc::clone(sink),
            None => self.registry.attach(log_name)?,
        };
        let evaluator = ExpectationEvaluator::new(sink, Arc::clone(&self.clock))
            .with_policy(self.settings.unexpected_status)
            .with_snippet_len(self.settings.snippet_len);
        Ok(RunScenario::new(Arc::clone(&self.client), Arc::new(evaluator)))
    }

    /// Runs a suite and optionally writes its report.
    ///
    /// # Errors
    ///
    /// Returns an error if the suite cannot be loaded or the log opened.
    pub async fn run(&self, args: &RunArgs) -> Result<SuiteReport, CliError> {
        let suite = suites::resolve(args.suite.suite.as_deref()).await?;
        let runner = self.runner(&suite.suite)?;
        tracing::info!(
            suite = %suite.suite,
            base_url = %self.client.base_url(),
            log = %self.registry.path_for(&suite.suite).display(),
            "running suite"
        );

        let report = RunSuite::new(runner, Arc::clone(&self.clock))
            .execute(&suite, &args.only)
            .await?;

        if let Some(path) = &args.report {
            write_report(path, &report).await?;
        }
        Ok(report)
    }

    /// Repeats one scenario and optionally writes the load report.
    ///
    /// `--iterations` and `--concurrency` take precedence over the load
    /// settings.
    /// # Errors
    ///
    /// Returns an error if the suite or scenario cannot be found or the log
    /// cannot be opened.
    pub async fn load(&self, args: &LoadArgs) -> Result<LoadReport, CliError> {
        let suite = suites::resolve(args.suite.suite.as_deref()).await?;
        let scenario = suite.find(&args.scenario).ok_or_else(|| {
            ApplicationError::NotFound(format!(
                "scenario `{}` in suite `{}`",
                args.scenario, suite.suite
            ))
        })?;

        let mut load = self.settings.load.clone();
        if let Some(iterations) = args.iterations {
            load.iterations = iterations;
        }
        if let Some(concurrency) = args.concurrency {
            load.concurrency = concurrency;
        }

        let runner = self.runner(LOAD_LOG)?;
        let report = LoadTest::new(runner).execute(scenario, &load).await?;

        if let Some(path) = &args.report {
            write_report(path, &report).await?;
        }
        Ok(report)
    }

    /// Scenario names of a suite, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the suite cannot be loaded.
    pub async fn list(&self, args: &SuiteArgs) -> Result<Vec<String>, CliError> {
        let suite = suites::resolve(args.suite.as_deref()).await?;
        Ok(suite.names().map(str::to_string).collect())
    }
}

/// Writes a suite summary.
fn print_suite(out: &mut impl Write, report: &SuiteReport) -> io::Result<()> {
    for result in &report.results {
        let mark = if result.passed { "ok  " } else { "FAIL" };
        let status = result
            .status
            .map_or_else(|| "---".to_string(), |s| s.to_string());
        write!(out, "{mark} {status} {} ({} ms)", result.name, result.duration_ms)?;
        if let Some(failure) = &result.failure {
            write!(out, ": {failure}")?;
        } else if result.unlisted {
            write!(out, " [unlisted status]")?;
        }
        writeln!(out)?;
    }
    writeln!(
        out,
        "\n{}: {} passed, {} failed, {:.1}% in {} ms",
        report.suite,
        report.passed,
        report.failed,
        report.pass_rate(),
        report.duration_ms
    )?;
    let failed: Vec<&str> = report.failures().map(|r| r.name.as_str()).collect();
    if !failed.is_empty() {
        writeln!(out, "failed: {}", failed.join(", "))?;
    }
    Ok(())
}

/// Writes a load summary.
fn print_load(out: &mut impl Write, report: &LoadReport) -> io::Result<()> {
    let latency = &report.latency;
    writeln!(
        out,
        "{}: {} iterations, {} workers\n  passed {}  failed {}  transport errors {}\n  \
         latency ms  min {:.1}  mean {:.1}  p50 {:.1}  p95 {:.1}  max {:.1}\n  \
         {:.1} req/s over {} ms",
        report.scenario,
        report.iterations,
        report.concurrency,
        report.passed,
        report.failed,
        report.transport_errors,
        latency.min_ms,
        latency.mean_ms,
        latency.p50_ms,
        latency.p95_ms,
        latency.max_ms,
        report.throughput(),
        report.wall_ms
    )
}

/// Runs the parsed command and maps the outcome to an exit code.
pub async fn dispatch(cli: &Cli, settings: Settings) -> ExitCode {
    let mut out = io::stdout();
    ExitCode::from(exit_status(&cli.command, settings, &mut out).await)
}

/// Runs `command`, writing its summary to `out`.
///
/// Returns [`EXIT_PASSED`] if every scenario or iteration passed,
/// [`EXIT_FAILED`] if any failed and [`EXIT_ERROR`] if the command could not
/// run.
pub async fn exit_status(command: &Command, settings: Settings, out: &mut impl Write) -> u8 {
    match execute(command, settings, out).await {
        Ok(true) => EXIT_PASSED,
        Ok(false) => EXIT_FAILED,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            EXIT_ERROR
        }
    }
}

async fn execute(
    command: &Command,
    settings: Settings,
    out: &mut impl Write,
) -> Result<bool, CliError> {
    let harness = Harness::new(settings)?;
    match command {
        Command::Run(args) => {
            let report = harness.run(args).await?;
            print_suite(out, &report)?;
            Ok(report.all_passed())
        }
        Command::Load(args) => {
            let report = harness.load(args).await?;
            print_load(out, &report)?;
            Ok(report.all_passed())
        }
        Command::List(args) => {
            for name in harness.list(args).await? {
                writeln!(out, "{name}")?;
            }
            Ok(true)
        }
    }
}
