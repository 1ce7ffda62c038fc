use crate::Result;
use core::fmt;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::process::Stdio;
use tokio::process::Command;

const LOG_TARGET: &str = "  dataflow";

/// Maximum time to wait for the gcloud CLI to mint a token
const GCLOUD_TIMEOUT: Duration = Duration::from_secs(30);

/// OAuth2 bearer token for the Google Cloud APIs
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token, ignoring surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            bail!("the access token is empty");
        }
        Ok(Self(token.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Use `explicit` when given, otherwise ask the gcloud CLI for a token
    ///
    /// # Errors
    ///
    /// Returns an error if no usable token can be obtained
    pub async fn resolve(explicit: Option<&str>) -> Result<Self> {
        if let Some(token) = explicit {
            log::debug!(target: LOG_TARGET, "Using the access token given on the command line");
            return Self::new(token);
        }

        log::debug!(target: LOG_TARGET, "Requesting an access token from gcloud");
        Self::from_command("gcloud", &["auth", "print-access-token"]).await
    }

    async fn from_command(program: &str, args: &[&str]) -> Result<Self> {
        let command_line = core::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .into_app_err_with(|| format!("could not run '{program}' to obtain an access token; pass --access-token instead"))?;

        let output = match tokio::time::timeout(GCLOUD_TIMEOUT, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(e).into_app_err_with(|| format!("'{command_line}' failed to run")),
            Err(_) => {
                bail!("'{command_line}' timed out after {} seconds", GCLOUD_TIMEOUT.as_secs());
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("'{command_line}' failed: {}", stderr.trim());
        }

        Self::new(String::from_utf8_lossy(&output.stdout))
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_whitespace() {
        let token = AccessToken::new("  ya29.token\n").unwrap();
        assert_eq!(token.as_str(), "ya29.token");
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(AccessToken::new("").is_err());
        assert!(AccessToken::new(" \n\t").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = AccessToken::new("secret-value").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret-value"));
    }

    #[tokio::test]
    async fn test_resolve_prefers_explicit_token() {
        let token = AccessToken::resolve(Some("explicit")).await.unwrap();
        assert_eq!(token.as_str(), "explicit");
    }

    #[tokio::test]
    async fn test_from_missing_command() {
        let err = AccessToken::from_command("job-metrics-no-such-program", &[]).await.unwrap_err();
        assert!(err.to_string().contains("could not run 'job-metrics-no-such-program'"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_from_command_output() {
        let token = AccessToken::from_command("echo", &["ya29.from-command"]).await.unwrap();
        assert_eq!(token.as_str(), "ya29.from-command");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_from_failing_command() {
        let err = AccessToken::from_command("false", &[]).await.unwrap_err();
        assert!(err.to_string().contains("'false' failed"));
    }
}
