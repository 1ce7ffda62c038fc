use super::{AggregateMetricRecord, RawMetricUpdate};
use crate::Result;
use ohno::bail;
use serde::{Deserialize, Serialize};

/// Origin tag of the metrics computed by the Dataflow service itself, as opposed to
/// counters defined by the user pipeline.
pub const SERVICE_ORIGIN: &str = "dataflow/v1b3";

/// Context key carrying the name a metric had before the service renamed it.
pub const ORIGINAL_NAME_CONTEXT_KEY: &str = "original_name";

const DEFAULT_NAME_PREFIXES: &[&str] = &["Total", "Billable"];
const DEFAULT_EXCLUDED_NAMES: &[&str] = &["ElementCount", "MeanByteCount"];
const DEFAULT_EXCLUDED_CONTEXT_KEYS: &[&str] = &["tentative", "execution_step", "step"];

/// The rules deciding which raw updates are job-wide aggregate metrics.
///
/// An update is selected when its origin matches the requested origin tag, its name
/// starts with one of `name_prefixes`, its name is not in `excluded_names`, it carries
/// none of `excluded_context_keys`, and it has a numeric scalar value.
///
/// The literals are tied to the service's metric naming scheme, so they live in the
/// configuration file rather than in code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterPolicy {
    /// Name prefixes of the metric families to report
    #[serde(default = "default_name_prefixes")]
    pub name_prefixes: Vec<String>,

    /// Metric names that are never reported
    #[serde(default = "default_excluded_names")]
    pub excluded_names: Vec<String>,

    /// Context keys whose presence disqualifies an update
    #[serde(default = "default_excluded_context_keys")]
    pub excluded_context_keys: Vec<String>,
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|&value| value.to_string()).collect()
}

fn default_name_prefixes() -> Vec<String> {
    to_strings(DEFAULT_NAME_PREFIXES)
}

fn default_excluded_names() -> Vec<String> {
    to_strings(DEFAULT_EXCLUDED_NAMES)
}

fn default_excluded_context_keys() -> Vec<String> {
    to_strings(DEFAULT_EXCLUDED_CONTEXT_KEYS)
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            name_prefixes: default_name_prefixes(),
            excluded_names: default_excluded_names(),
            excluded_context_keys: default_excluded_context_keys(),
        }
    }
}

impl FilterPolicy {
    /// Select the aggregate metrics among `updates`.
    ///
    /// Records come out in the order their updates were encountered. Repeated names
    /// are kept, one record per selected update.
    #[must_use]
    pub fn filter(&self, origin_tag: &str, updates: &[RawMetricUpdate]) -> Vec<AggregateMetricRecord> {
        updates.iter().filter_map(|update| self.select(origin_tag, update)).collect()
    }

    /// Whether `update` passes every rule of this policy.
    #[must_use]
    pub fn selects(&self, origin_tag: &str, update: &RawMetricUpdate) -> bool {
        self.select(origin_tag, update).is_some()
    }

    fn select(&self, origin_tag: &str, update: &RawMetricUpdate) -> Option<AggregateMetricRecord> {
        let value = update.scalar?;

        let selected = update.origin == origin_tag
            && !self.excluded_context_keys.iter().any(|key| update.has_context(key))
            && !self.excluded_names.iter().any(|name| *name == update.name)
            && self.name_prefixes.iter().any(|prefix| update.name.starts_with(prefix.as_str()));

        selected.then(|| AggregateMetricRecord::from_update(update, value))
    }

    /// Check that the policy can select anything at all.
    ///
    /// # Errors
    ///
    /// Returns an error if no name prefix is given or any list holds an empty string
    pub fn validate(&self) -> Result<()> {
        if self.name_prefixes.is_empty() {
            bail!("filter.name_prefixes must list at least one prefix");
        }

        for (field, values) in [
            ("name_prefixes", &self.name_prefixes),
            ("excluded_names", &self.excluded_names),
            ("excluded_context_keys", &self.excluded_context_keys),
        ] {
            if values.iter().any(String::is_empty) {
                bail!("filter.{field} must not contain empty strings");
            }
        }

        Ok(())
    }
}
