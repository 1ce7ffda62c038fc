#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for job-metrics
//!
//! This library holds all functionality for the job-metrics tool, which fetches the
//! metrics of a single Dataflow job and reduces them to the job-wide aggregate counters.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`dataflow`]: Access to the Dataflow metrics API
//! - [`metrics`]: Raw metric updates and the aggregate-metric filter
//! - [`reports`]: The job metrics report and its JSON rendering

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod dataflow;
pub mod metrics;
pub mod reports;

pub use crate::commands::{Host, run};
