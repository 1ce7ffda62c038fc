use super::Host;
use super::common::{Common, CommonArgs, JobArgs, collect_report};
use super::config::Config;
use crate::Result;
use crate::dataflow::{AccessToken, Client, JobRef};
use crate::reports::JobMetricsReport;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// OAuth2 access token (default is the output of `gcloud auth print-access-token`)
    #[arg(long, value_name = "TOKEN", env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_fetch<H: Host>(host: &mut H, args: &FetchArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let result = fetch_report(&common.config, &args.job.job_ref(), args.access_token.as_deref()).await;
    common.finish(result)
}

async fn fetch_report(config: &Config, job: &JobRef, access_token: Option<&str>) -> Result<JobMetricsReport> {
    let token = AccessToken::resolve(access_token).await?;
    let client = Client::new(&config.endpoint_url()?, &token, config.request_timeout)?;
    collect_report(client, job, &config.origin, &config.filter).await
}
