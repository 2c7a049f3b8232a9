//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::timing::{Duration, PollPolicy, RetryPolicy, DEFAULT_MAX_RETRIES};

/// Base URL of the hosted API
pub const DEFAULT_API_URL: &str = "https://api.soniox.com/v1";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    /// Default model for transcription requests
    pub model: Option<String>,
    pub check_interval: Option<String>,
    pub max_wait: Option<String>,
    pub request_timeout: Option<String>,
    pub upload_timeout: Option<String>,
    pub max_retries: Option<u32>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            api_url: Some(DEFAULT_API_URL.to_string()),
            model: None,
            check_interval: Some(Duration::default_check_interval().to_string()),
            max_wait: Some(Duration::default_max_wait().to_string()),
            request_timeout: Some(Duration::default_request_timeout().to_string()),
            upload_timeout: Some(Duration::default_upload_timeout().to_string()),
            max_retries: Some(DEFAULT_MAX_RETRIES),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            api_url: other.api_url.or(self.api_url),
            model: other.model.or(self.model),
            check_interval: other.check_interval.or(self.check_interval),
            max_wait: other.max_wait.or(self.max_wait),
            request_timeout: other.request_timeout.or(self.request_timeout),
            upload_timeout: other.upload_timeout.or(self.upload_timeout),
            max_retries: other.max_retries.or(self.max_retries),
        }
    }

    pub fn api_url_or_default(&self) -> &str {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
    }

    /// Get check_interval as parsed Duration, or default if not set/invalid
    pub fn check_interval_or_default(&self) -> Duration {
        parse_or(&self.check_interval, Duration::default_check_interval)
    }

    /// Get max_wait as parsed Duration, or default if not set/invalid
    pub fn max_wait_or_default(&self) -> Duration {
        parse_or(&self.max_wait, Duration::default_max_wait)
    }

    pub fn request_timeout_or_default(&self) -> Duration {
        parse_or(&self.request_timeout, Duration::default_request_timeout)
    }

    pub fn upload_timeout_or_default(&self) -> Duration {
        parse_or(&self.upload_timeout, Duration::default_upload_timeout)
    }

    pub fn max_retries_or_default(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    /// Polling schedule used when a record does not override it
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            self.check_interval_or_default().as_std(),
            self.max_wait_or_default().as_std(),
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_retries(self.max_retries_or_default())
    }
}

fn parse_or(value: &Option<String>, default: fn() -> Duration) -> Duration {
    value
        .as_ref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(default)
}
