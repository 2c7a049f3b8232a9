//! Immutable client configuration shared by every API call

use std::time::Duration as StdDuration;

use super::app_config::{AppConfig, DEFAULT_API_URL};
use crate::domain::timing::{Duration, RetryPolicy};

/// Connection settings for the HTTP client.
///
/// Built once per run and shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub retry: RetryPolicy,
    pub request_timeout: StdDuration,
    pub upload_timeout: StdDuration,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            request_timeout: Duration::default_request_timeout().as_std(),
            upload_timeout: Duration::default_upload_timeout().as_std(),
        }
    }

    /// Settings from a merged config; `None` when no API key is available
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())?;

        Some(Self {
            base_url: config.api_url_or_default().to_string(),
            api_key: api_key.to_string(),
            retry: config.retry_policy(),
            request_timeout: config.request_timeout_or_default().as_std(),
            upload_timeout: config.upload_timeout_or_default().as_std(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Full URL for an API path such as `/files`
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
