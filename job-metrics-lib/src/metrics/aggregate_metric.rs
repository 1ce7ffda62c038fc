use super::RawMetricUpdate;
use super::filter_policy::ORIGINAL_NAME_CONTEXT_KEY;
use serde::Serialize;

/// A job-wide metric selected from the raw update set.
///
/// Each record mirrors exactly one raw update; nothing is summed or merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetricRecord {
    metric_name: String,
    original_name: String,
    metric_value: f64,
    metric_time_millis: i64,
}

impl AggregateMetricRecord {
    #[must_use]
    pub fn new(metric_name: impl Into<String>, original_name: impl Into<String>, metric_value: f64, metric_time_millis: i64) -> Self {
        Self {
            metric_name: metric_name.into(),
            original_name: original_name.into(),
            metric_value,
            metric_time_millis,
        }
    }

    /// Build a record from a selected update and its scalar value.
    ///
    /// The original name falls back to the metric name when the update carries no
    /// `original_name` context.
    pub(super) fn from_update(update: &RawMetricUpdate, metric_value: f64) -> Self {
        let original_name = update.context_value(ORIGINAL_NAME_CONTEXT_KEY).unwrap_or(update.name.as_str());
        Self::new(update.name.as_str(), original_name, metric_value, update.update_time.timestamp_millis())
    }

    #[must_use]
    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    #[must_use]
    pub const fn metric_value(&self) -> f64 {
        self.metric_value
    }

    #[must_use]
    pub const fn metric_time_millis(&self) -> i64 {
        self.metric_time_millis
    }
}
