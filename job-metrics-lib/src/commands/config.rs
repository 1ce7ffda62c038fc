use crate::Result;
use crate::dataflow::DEFAULT_ENDPOINT;
use crate::metrics::{FilterPolicy, SERVICE_ORIGIN};
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File name looked up when no configuration path is given
pub const DEFAULT_CONFIG_FILE: &str = "job-metrics.toml";

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the Dataflow API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Time allowed for the metrics request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Origin tag of the service-computed metrics
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Rules selecting the aggregate metrics
    #[serde(default)]
    pub filter: FilterPolicy,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_origin() -> String {
    SERVICE_ORIGIN.to_string()
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `job-metrics.toml` in `base_dir` is used when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds invalid values
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading job-metrics configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading job-metrics configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config
            .validate()
            .map_err(|e| app_err!("invalid configuration file '{final_path}': {e}"))?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// The endpoint as a URL
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an http or https URL
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).into_app_err_with(|| format!("endpoint '{}' is not a valid URL", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(app_err!("endpoint '{}' must use http or https", self.endpoint));
        }
        Ok(url)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or the filter policy is unusable
    pub fn validate(&self) -> Result<()> {
        let _ = self.endpoint_url()?;

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        if self.origin.is_empty() {
            return Err(app_err!("origin must not be empty"));
        }

        self.filter.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
