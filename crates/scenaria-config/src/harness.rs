use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_SESSION_ID: &str = "scenario-harness-session";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_OUTPUT_ROOT: &str = "test_results";

/// Settings for one harness run.
///
/// Every field has a default, so a config file only needs to name the values
/// it overrides:
///
/// ```json
/// { "base_url": "http://10.0.0.5:8000", "timeout_seconds": 120 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
  /// Address of the service under test, without a trailing path.
  pub base_url: String,

  /// Session identifier shared by every case in a run.
  pub session_id: String,

  /// Per-request timeout.
  pub timeout_seconds: u64,

  /// Root directory for `<date>/<component>/` artifact folders.
  pub output_root: PathBuf,

  /// Treat a response body whose `status` field is not `"success"` as a
  /// failure even when the HTTP status is 2xx.
  pub strict_status: bool,

  /// Write a `summary.json` next to the case artifacts.
  pub write_summary: bool,
}

impl Default for HarnessConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      session_id: DEFAULT_SESSION_ID.to_string(),
      timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
      output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
      strict_status: true,
      write_summary: false,
    }
  }
}

impl HarnessConfig {
  /// Parse and validate a config document.
  pub fn from_json(content: &str) -> Result<Self, ConfigError> {
    let config: HarnessConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_seconds)
  }

  /// Check the values a run cannot start without.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let base_url = Url::parse(&self.base_url).map_err(|e| {
      ConfigError::InvalidHarness(format!("invalid base_url '{}': {}", self.base_url, e))
    })?;
    if !matches!(base_url.scheme(), "http" | "https") || base_url.host().is_none() {
      return Err(ConfigError::InvalidHarness(format!(
        "base_url must be an http(s) address with a host, got '{}'",
        self.base_url
      )));
    }
    if self.session_id.trim().is_empty() {
      return Err(ConfigError::InvalidHarness(
        "session_id must not be empty".to_string(),
      ));
    }
    if self.timeout_seconds == 0 {
      return Err(ConfigError::InvalidHarness(
        "timeout_seconds must be greater than zero".to_string(),
      ));
    }
    Ok(())
  }
}
