//! Dataflow API client
//!
//! Minimal client for the `projects.locations.jobs.getMetrics` endpoint.

use super::{AccessToken, JobRef, MetricsFetcher, parse_job_metrics};
use crate::Result;
use crate::metrics::RawMetricUpdate;
use core::time::Duration;
use ohno::{IntoAppError, app_err, bail};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

const LOG_TARGET: &str = "  dataflow";

/// Public endpoint of the Dataflow service
pub const DEFAULT_ENDPOINT: &str = "https://dataflow.googleapis.com";

/// Longest response excerpt quoted in error messages
const MAX_ERROR_DETAIL_CHARS: usize = 300;

/// Error envelope returned by Google APIs
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Authenticated session against the Dataflow API
#[derive(Debug)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    endpoint: Url,
}

impl Client {
    /// Create a new session for `endpoint`, authenticating every request with `token`
    pub fn new(endpoint: &Url, token: &AccessToken, timeout: Duration) -> Result<Self> {
        let mut auth_val =
            HeaderValue::from_str(&format!("Bearer {}", token.as_str())).into_app_err("access token is not a valid header value")?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);

        let client = reqwest::Client::builder()
            .user_agent("job-metrics")
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .into_app_err("creating the HTTP client")?;

        log::debug!(target: LOG_TARGET, "Opened Dataflow session for {endpoint}");

        Ok(Self {
            client,
            endpoint: endpoint.clone(),
        })
    }

    /// Get the endpoint this session talks to
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the metrics URL of `job`, percent-encoding every path segment
    pub fn metrics_url(&self, job: &JobRef) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| app_err!("endpoint '{}' cannot serve as a base URL", self.endpoint))?;
            let _ = segments.pop_if_empty().extend([
                "v1b3",
                "projects",
                job.project_id.as_str(),
                "locations",
                job.region.as_str(),
                "jobs",
                job.job_id.as_str(),
                "metrics",
            ]);
        }
        Ok(url)
    }

    /// Fetch every metric update the service holds for `job`
    pub async fn get_job_metrics(&self, job: &JobRef) -> Result<Vec<RawMetricUpdate>> {
        let url = self.metrics_url(job)?;
        log::info!(target: LOG_TARGET, "Fetching metrics for job '{job}'");

        let resp = self
            .client
            .get(url.as_str())
            .send()
            .await
            .into_app_err_with(|| format!("requesting metrics for job '{job}'"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .into_app_err_with(|| format!("reading the metrics response for job '{job}'"))?;

        if !status.is_success() {
            let detail = error_detail(&body);
            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    bail!("not authorized to read metrics for job '{job}' ({status}): {detail}");
                }
                StatusCode::NOT_FOUND => {
                    bail!("job '{job}' was not found ({status}): {detail}");
                }
                _ => {
                    bail!("Dataflow API request for job '{job}' failed ({status}): {detail}");
                }
            }
        }

        let updates = parse_job_metrics(&body).into_app_err_with(|| format!("decoding metrics for job '{job}'"))?;
        log::debug!(target: LOG_TARGET, "Received {} metric updates for job '{job}'", updates.len());
        Ok(updates)
    }
}

impl MetricsFetcher for Client {
    async fn fetch_job_metrics(&self, job: &JobRef) -> Result<Vec<RawMetricUpdate>> {
        self.get_job_metrics(job).await
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        log::debug!(target: LOG_TARGET, "Closed Dataflow session for {}", self.endpoint);
    }
}

/// Extract a readable message from an error response body
fn error_detail(body: &str) -> String {
    if let Ok(response) = serde_json::from_str::<ErrorResponse>(body) {
        return response.error.message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    if trimmed.chars().count() > MAX_ERROR_DETAIL_CHARS {
        let excerpt: String = trimmed.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
        format!("{excerpt}...")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> Client {
        let token = AccessToken::new("test-token").unwrap();
        Client::new(&Url::parse(endpoint).unwrap(), &token, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_metrics_url() {
        let client = client(DEFAULT_ENDPOINT);
        let url = client.metrics_url(&JobRef::new("my-project", "europe-west1", "2024-03-01_02_03_04-567")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dataflow.googleapis.com/v1b3/projects/my-project/locations/europe-west1/jobs/2024-03-01_02_03_04-567/metrics"
        );
    }

    #[test]
    fn test_metrics_url_keeps_endpoint_prefix() {
        let client = client("http://localhost:8080/proxy/");
        let url = client.metrics_url(&JobRef::new("p", "r", "j")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v1b3/projects/p/locations/r/jobs/j/metrics");
    }

    #[test]
    fn test_metrics_url_encodes_segments() {
        let client = client(DEFAULT_ENDPOINT);
        let url = client.metrics_url(&JobRef::new("p", "r", "a/b c")).unwrap();
        assert!(url.path().ends_with("/jobs/a%2Fb%20c/metrics"), "unexpected path {}", url.path());
    }

    #[test]
    fn test_endpoint() {
        let client = client("http://127.0.0.1:9000");
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_error_detail_from_google_error() {
        let body = r#"{"error": {"code": 404, "message": "(abc): Information about job x could not be found.", "status": "NOT_FOUND"}}"#;
        assert_eq!(error_detail(body), "(abc): Information about job x could not be found.");
    }

    #[test]
    fn test_error_detail_plain_text() {
        assert_eq!(error_detail("  upstream connect error \n"), "upstream connect error");
    }

    #[test]
    fn test_error_detail_empty() {
        assert_eq!(error_detail(""), "empty response body");
    }

    #[test]
    fn test_error_detail_truncates_long_bodies() {
        let body = "x".repeat(MAX_ERROR_DETAIL_CHARS + 50);
        let detail = error_detail(&body);
        assert_eq!(detail.len(), MAX_ERROR_DETAIL_CHARS + 3);
        assert!(detail.ends_with("..."));
    }
}
