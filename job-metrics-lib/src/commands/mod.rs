//! Command-line interface and orchestration for job-metrics
//!
//! This module implements the CLI commands and connects the Dataflow client, the
//! metric filter, and the JSON report into end-to-end workflows.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **fetch**: Retrieve the metrics of a job from the Dataflow API, keep the
//!   aggregate ones, and print the report
//! - **filter**: Same as fetch, but reads a saved `getMetrics` response from disk
//!   instead of calling the API
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. The fetch and filter commands share a pipeline:
//!
//! 1. Parse arguments, set up logging, and load configuration
//! 2. Obtain the raw metric updates (over HTTP or from a file)
//! 3. Select the aggregate metrics with the configured filter policy
//! 4. Emit the report as JSON to stdout or to a file
//!
//! Any failure is reported on the error stream and ends the process with a
//! non-zero exit code; no partial report is ever written.

mod common;
mod config;
mod fetch;
mod filter;
mod host;
mod init;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use common::{build_report, collect_report};
pub use fetch::{FetchArgs, process_fetch};
pub use filter::{FilterArgs, process_filter};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
