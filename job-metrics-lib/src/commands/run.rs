//! Command dispatch logic for job-metrics

use super::{FetchArgs, FilterArgs, InitArgs, ValidateArgs, init_config, process_fetch, process_filter, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "job-metrics", version, author, long_about = None)]
#[command(about = "Print the aggregate metrics of a completed Dataflow job as JSON")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: JobMetricsSubcommand,
}

#[derive(Subcommand, Debug)]
enum JobMetricsSubcommand {
    /// Fetch a job's metrics from the Dataflow API and report the aggregate ones
    Fetch(Box<FetchArgs>),
    /// Report the aggregate metrics found in a saved `getMetrics` response
    Filter(Box<FilterArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        JobMetricsSubcommand::Fetch(fetch_args) => process_fetch(host, fetch_args).await,
        JobMetricsSubcommand::Filter(filter_args) => process_filter(host, filter_args),
        JobMetricsSubcommand::Init(init_args) => init_config(host, init_args),
        JobMetricsSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch_arguments() {
        let cli = Cli::parse_from([
            "job-metrics",
            "fetch",
            "-p",
            "my-project",
            "-r",
            "us-central1",
            "-j",
            "2024-03-01_02_00_00-123",
            "--access-token",
            "secret",
            "--pretty",
        ]);

        let JobMetricsSubcommand::Fetch(args) = cli.command else {
            panic!("expected the fetch subcommand");
        };
        assert_eq!(args.job.project_id, "my-project");
        assert_eq!(args.job.region, "us-central1");
        assert_eq!(args.job.job_id, "2024-03-01_02_00_00-123");
        assert_eq!(args.access_token.as_deref(), Some("secret"));
        assert!(args.common.pretty);
    }

    #[test]
    fn test_fetch_requires_job_identity() {
        let result = Cli::try_parse_from(["job-metrics", "fetch", "-p", "my-project"]);
        assert!(result.is_err());
    }
}
