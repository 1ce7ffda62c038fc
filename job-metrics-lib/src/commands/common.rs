//! Processing logic shared between the fetch and filter commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::dataflow::{JobRef, MetricsFetcher, fetch_job_metrics};
use crate::metrics::{FilterPolicy, RawMetricUpdate};
use crate::reports::{JobMetricsReport, JsonStyle, generate_json};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "   metrics";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Identity of the job whose metrics are reported
#[derive(Args, Debug)]
pub struct JobArgs {
    /// GCP project ID
    #[arg(long = "project", short = 'p', value_name = "PROJECT_ID")]
    pub project_id: String,

    /// GCP region name
    #[arg(long, short = 'r', value_name = "REGION")]
    pub region: String,

    /// Dataflow job ID
    #[arg(long = "job", short = 'j', value_name = "JOB_ID")]
    pub job_id: String,
}

impl JobArgs {
    #[must_use]
    pub fn job_ref(&self) -> JobRef {
        JobRef::new(self.project_id.as_str(), self.region.as_str(), self.job_id.as_str())
    }
}

/// Arguments shared between the fetch and filter commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to configuration file (default is `job-metrics.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Write the report to a file instead of to the terminal
    #[arg(long, short = 'o', value_name = "PATH", help_heading = "Report Output")]
    pub output: Option<Utf8PathBuf>,

    /// Indent the JSON report
    #[arg(long, help_heading = "Report Output")]
    pub pretty: bool,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    host: &'a mut H,
    output: Option<Utf8PathBuf>,
    style: JsonStyle,
}

impl<'a, H: Host> Common<'a, H> {
    /// Create a new Common processor with logger and config
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let config = match Config::load(Utf8Path::new("."), args.config.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                let _ = writeln!(host.error(), "❌ {e}");
                host.exit(1);
                return Err(e);
            }
        };

        Ok(Self {
            config,
            host,
            output: args.output.clone(),
            style: if args.pretty { JsonStyle::Pretty } else { JsonStyle::Compact },
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        let level = match log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        // a logger may already be installed when several commands run in one process
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .try_init();
    }

    /// Filter `updates` with the configured policy and assemble the report
    #[must_use]
    pub fn build_report(&self, job: &JobRef, updates: &[RawMetricUpdate]) -> JobMetricsReport {
        build_report(job, &self.config.origin, &self.config.filter, updates)
    }

    /// Emit the report on success, or report the failure and signal a non-zero exit
    pub fn finish(&mut self, result: Result<JobMetricsReport>) -> Result<()> {
        let outcome = result.and_then(|report| self.emit(&report));

        if let Err(e) = &outcome {
            let _ = writeln!(self.host.error(), "❌ {e}");
            self.host.exit(1);
        }

        outcome
    }

    fn emit(&mut self, report: &JobMetricsReport) -> Result<()> {
        let mut text = String::new();
        generate_json(report, self.style, &mut text)?;

        if let Some(path) = &self.output {
            fs::write(path, text).into_app_err_with(|| format!("writing the report to '{path}'"))?;
            log::info!(target: LOG_TARGET, "Wrote report to '{path}'");
        } else {
            self.host.output().write_all(text.as_bytes()).into_app_err("writing the report")?;
        }

        Ok(())
    }
}

/// Filter `updates` and assemble the report for `job`
#[must_use]
pub fn build_report(job: &JobRef, origin: &str, policy: &FilterPolicy, updates: &[RawMetricUpdate]) -> JobMetricsReport {
    let records = policy.filter(origin, updates);
    log::info!(
        target: LOG_TARGET,
        "Selected {} aggregate metrics out of {} updates for job '{job}'",
        records.len(),
        updates.len()
    );

    JobMetricsReport::build(job.project_id.as_str(), job.region.as_str(), job.job_id.as_str(), records)
}

/// Fetch the metrics of `job` through `fetcher`, then filter them into a report
///
/// The fetcher is released as soon as the fetch completes. Fetch errors are returned
/// as they are, with no retry and no partial report.
pub async fn collect_report<F: MetricsFetcher>(fetcher: F, job: &JobRef, origin: &str, policy: &FilterPolicy) -> Result<JobMetricsReport> {
    let updates = fetch_job_metrics(fetcher, job).await?;
    Ok(build_report(job, origin, policy, &updates))
}
