//! Wire types of the `projects.locations.jobs.getMetrics` response
//!
//! Only the fields we use are modeled; everything else in the response is ignored.

use crate::Result;
use crate::metrics::RawMetricUpdate;
use chrono::{DateTime, Utc};
use ohno::IntoAppError;
use serde::Deserialize;
use std::collections::HashMap;

/// Response body of the job metrics endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetrics {
    pub metric_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metrics: Vec<MetricUpdate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricUpdate {
    pub name: MetricStructuredName,

    /// Arbitrary JSON value; only numbers count as scalar metrics
    #[serde(default)]
    pub scalar: Option<serde_json::Value>,

    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct MetricStructuredName {
    pub origin: String,
    pub name: String,
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl From<MetricUpdate> for RawMetricUpdate {
    fn from(update: MetricUpdate) -> Self {
        Self {
            name: update.name.name,
            origin: update.name.origin,
            context: update.name.context,
            scalar: update.scalar.as_ref().and_then(serde_json::Value::as_f64),
            // the service omits unset timestamps; they read as the epoch
            update_time: update.update_time.unwrap_or(DateTime::UNIX_EPOCH),
        }
    }
}

impl JobMetrics {
    /// Convert the response into raw metric updates, in response order.
    #[must_use]
    pub fn into_updates(self) -> Vec<RawMetricUpdate> {
        self.metrics.into_iter().map(RawMetricUpdate::from).collect()
    }
}

/// Parse a `getMetrics` response body into raw metric updates.
///
/// # Errors
///
/// Returns an error if the text is not a valid job metrics document
pub fn parse_job_metrics(text: &str) -> Result<Vec<RawMetricUpdate>> {
    let job_metrics: JobMetrics = serde_json::from_str(text).into_app_err("parsing Dataflow job metrics")?;
    Ok(job_metrics.into_updates())
}
