//! Integration test for the `validate` command.
//!
//! Exercises the path where no explicit `--config` is provided, so the defaults
//! apply when the current directory holds no `job-metrics.toml`.

use job_metrics_lib::Host;

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, _code: i32) {}
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_validate_without_explicit_config() {
    let mut host = TestHost::new();
    let result = job_metrics_lib::run(&mut host, ["job-metrics", "validate"]).await;

    assert!(result.is_ok(), "validate without --config should succeed: {result:?}");

    let output = host.output_str();
    assert!(output.contains("Configuration file is valid"), "got: {output}");
    assert!(output.contains("or the defaults if absent"), "got: {output}");
    assert!(output.contains("'dataflow/v1b3'"), "got: {output}");
}
