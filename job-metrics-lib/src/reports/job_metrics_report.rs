use crate::metrics::AggregateMetricRecord;
use serde::Serialize;

/// The aggregate metrics of one job, along with the job's identity.
///
/// The identity fields are echoed from the request as given; they are not checked
/// against the metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetricsReport {
    project_id: String,
    region: String,
    job_id: String,
    metrics: Vec<AggregateMetricRecord>,
}

impl JobMetricsReport {
    #[must_use]
    pub fn build(
        project_id: impl Into<String>,
        region: impl Into<String>,
        job_id: impl Into<String>,
        metrics: Vec<AggregateMetricRecord>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            region: region.into(),
            job_id: job_id.into(),
            metrics,
        }
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    #[must_use]
    pub fn metrics(&self) -> &[AggregateMetricRecord] {
        &self.metrics
    }
}
