//! Raw metric updates and the aggregate-metric filter
//!
//! The Dataflow service reports hundreds of metric updates for a single job: per-step
//! breakdowns, tentative values, user counters, distributions. Only a handful of them
//! are job-wide totals worth reporting.
//!
//! # Implementation Model
//!
//! - [`RawMetricUpdate`] is one update as fetched from the service, read-only input.
//! - [`FilterPolicy`] holds the allow and deny lists that decide which updates are
//!   aggregate metrics. [`FilterPolicy::filter`] maps the selected updates to
//!   [`AggregateMetricRecord`] values, preserving encounter order.
//!
//! The filter is a pure function over borrowed input: it performs no I/O, never fails,
//! and never merges or reorders updates.

mod aggregate_metric;
mod filter_policy;
mod raw_metric_update;

pub use aggregate_metric::AggregateMetricRecord;
pub use filter_policy::{FilterPolicy, ORIGINAL_NAME_CONTEXT_KEY, SERVICE_ORIGIN};
pub use raw_metric_update::RawMetricUpdate;
