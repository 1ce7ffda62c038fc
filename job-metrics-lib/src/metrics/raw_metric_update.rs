use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A single metric update as reported by the metrics service.
///
/// The presence of a context key is meaningful on its own (`tentative`, `step`, ...),
/// independent of its value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetricUpdate {
    pub name: String,
    pub origin: String,
    pub context: HashMap<String, String>,

    /// Only set for scalar updates whose value is a number.
    pub scalar: Option<f64>,
    pub update_time: DateTime<Utc>,
}

impl RawMetricUpdate {
    #[must_use]
    pub fn new(name: impl Into<String>, origin: impl Into<String>, update_time: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
            context: HashMap::new(),
            scalar: None,
            update_time,
        }
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn with_scalar(mut self, value: f64) -> Self {
        self.scalar = Some(value);
        self
    }

    #[must_use]
    pub fn has_context(&self, key: &str) -> bool {
        self.context.contains_key(key)
    }

    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T10:00:00.250Z").unwrap().into()
    }

    #[test]
    fn test_new_has_no_context_or_scalar() {
        let update = RawMetricUpdate::new("TotalVcpuTime", "dataflow/v1b3", timestamp());
        assert_eq!(update.name, "TotalVcpuTime");
        assert_eq!(update.origin, "dataflow/v1b3");
        assert!(update.context.is_empty());
        assert!(update.scalar.is_none());
    }

    #[test]
    fn test_context_presence_ignores_value() {
        let update = RawMetricUpdate::new("TotalVcpuTime", "dataflow/v1b3", timestamp()).with_context("tentative", "");
        assert!(update.has_context("tentative"));
        assert_eq!(update.context_value("tentative"), Some(""));
        assert!(!update.has_context("step"));
        assert_eq!(update.context_value("step"), None);
    }

    #[test]
    fn test_with_scalar() {
        let update = RawMetricUpdate::new("TotalVcpuTime", "dataflow/v1b3", timestamp()).with_scalar(42.0);
        assert_eq!(update.scalar, Some(42.0));
    }
}
