use super::Host;
use super::common::{Common, CommonArgs, JobArgs};
use crate::Result;
use crate::dataflow::parse_job_metrics;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::IntoAppError;
use std::fs;

#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// Saved response of the Dataflow `getMetrics` API
    #[arg(long, short = 'i', value_name = "PATH")]
    pub input: Utf8PathBuf,

    #[command(flatten)]
    pub job: JobArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn process_filter<H: Host>(host: &mut H, args: &FilterArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;

    let result = fs::read_to_string(&args.input)
        .into_app_err_with(|| format!("reading metrics file '{}'", args.input))
        .and_then(|text| parse_job_metrics(&text))
        .map(|updates| common.build_report(&args.job.job_ref(), &updates));

    common.finish(result)
}
