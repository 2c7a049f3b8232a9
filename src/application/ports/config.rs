//! Configuration storage port
//!
//! A store persists the optional settings layer that sits between the
//! built-in defaults and the `SONIOX_API_KEY`/`SONIOX_API_URL` environment
//! variables; command-line flags override all of them. Stored keys are
//! `api_key`, `api_url`, `model`, `check_interval`, `max_wait`,
//! `request_timeout`, `upload_timeout` and `max_retries`.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Stored settings, or an empty config when nothing was saved yet
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Replace the stored settings
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Where the settings live
    fn location(&self) -> &Path;

    /// Store `AppConfig::defaults()`. Fails with `AlreadyExists` if settings
    /// were saved before.
    async fn init(&self) -> Result<(), ConfigError>;

    /// Load, apply `change`, and save. Nothing is written when `change` fails.
    async fn update<F>(&self, change: F) -> Result<AppConfig, ConfigError>
    where
        F: FnOnce(&mut AppConfig) -> Result<(), ConfigError> + Send,
    {
        let mut config = self.load().await?;
        change(&mut config)?;
        self.save(&config).await?;
        Ok(config)
    }
}
