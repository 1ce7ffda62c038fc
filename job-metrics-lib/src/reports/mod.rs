//! The job metrics report and its JSON rendering
//!
//! [`JobMetricsReport::build`] assembles the filtered records with the identity of the job
//! they came from. [`generate_json`] renders a report as a single JSON document whose
//! field names are a stable contract with downstream consumers.

mod job_metrics_report;
mod json;

pub use job_metrics_report::JobMetricsReport;
pub use json::{JsonStyle, generate as generate_json};
