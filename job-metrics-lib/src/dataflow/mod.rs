//! Access to the Dataflow metrics API
//!
//! The rest of the crate only sees the [`MetricsFetcher`] trait: given a [`JobRef`], return
//! every metric update the service holds for that job. [`Client`] implements it over the
//! Dataflow REST API, authenticated with an [`AccessToken`].
//!
//! A fetcher is a session: [`fetch_job_metrics`] takes it by value and releases it once the
//! single request completes, whether the request succeeded or not.

mod access_token;
mod api;
mod client;

pub use access_token::AccessToken;
pub use api::{JobMetrics, MetricStructuredName, MetricUpdate, parse_job_metrics};
pub use client::{Client, DEFAULT_ENDPOINT};

use crate::Result;
use crate::metrics::RawMetricUpdate;
use core::fmt;

/// Identifies a single Dataflow job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRef {
    pub project_id: String,
    pub region: String,
    pub job_id: String,
}

impl JobRef {
    #[must_use]
    pub fn new(project_id: impl Into<String>, region: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            region: region.into(),
            job_id: job_id.into(),
        }
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.project_id, self.region, self.job_id)
    }
}

/// Source of the raw metric updates of a job.
pub trait MetricsFetcher {
    /// Return the complete, unfiltered metric set of `job` at the time of the call.
    fn fetch_job_metrics(&self, job: &JobRef) -> impl Future<Output = Result<Vec<RawMetricUpdate>>> + Send;
}

/// Run one fetch against `fetcher`, then release it.
///
/// Errors from the fetcher are returned unchanged and are not retried.
pub async fn fetch_job_metrics<F: MetricsFetcher>(fetcher: F, job: &JobRef) -> Result<Vec<RawMetricUpdate>> {
    let result = fetcher.fetch_job_metrics(job).await;
    drop(fetcher);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ohno::app_err;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeFetcher {
        fail: bool,
        released: Arc<AtomicBool>,
    }

    impl Drop for FakeFetcher {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    impl MetricsFetcher for FakeFetcher {
        async fn fetch_job_metrics(&self, job: &JobRef) -> Result<Vec<RawMetricUpdate>> {
            if self.fail {
                return Err(app_err!("permission denied for {job}"));
            }
            Ok(vec![RawMetricUpdate::new("TotalVcpuTime", "dataflow/v1b3", Utc::now()).with_scalar(1.0)])
        }
    }

    #[test]
    fn test_job_ref_display() {
        let job = JobRef::new("my-project", "us-central1", "2024-03-01_00_00_00-123");
        assert_eq!(job.to_string(), "my-project/us-central1/2024-03-01_00_00_00-123");
    }

    #[tokio::test]
    async fn test_fetch_releases_session_on_success() {
        let released = Arc::new(AtomicBool::new(false));
        let fetcher = FakeFetcher { fail: false, released: Arc::clone(&released) };

        let updates = fetch_job_metrics(fetcher, &JobRef::new("p", "r", "j")).await.unwrap();

        assert_eq!(updates.len(), 1);
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_fetch_releases_session_on_failure() {
        let released = Arc::new(AtomicBool::new(false));
        let fetcher = FakeFetcher { fail: true, released: Arc::clone(&released) };

        let err = fetch_job_metrics(fetcher, &JobRef::new("p", "r", "j")).await.unwrap_err();

        assert!(err.to_string().contains("permission denied for p/r/j"));
        assert!(released.load(Ordering::SeqCst));
    }
}
