//! TOML settings file under the platform config directory
//!
//! Resolves to `$XDG_CONFIG_HOME/soniox-batch/config.toml` on Linux. The file
//! carries the API key, so on Unix it is created readable by the owner only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

const APP_DIR: &str = "soniox-batch";
const CONFIG_FILE: &str = "config.toml";

pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            path: base.join(APP_DIR).join(CONFIG_FILE),
        }
    }

    /// Store backed by an explicit file, used by tests
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn render(config: &AppConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    async fn ensure_parent(&self) -> Result<(), ConfigError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string())),
            _ => Ok(()),
        }
    }

    /// Owner-only open options for a settings file
    fn open_options(create_new: bool) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.write(true);
        if create_new {
            options.create_new(true);
        } else {
            options.create(true).truncate(true);
        }
        #[cfg(unix)]
        options.mode(0o600);
        options
    }

    async fn write(path: &Path, content: &str, create_new: bool) -> std::io::Result<()> {
        let mut file = Self::open_options(create_new).open(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file");
                Ok(AppConfig::empty())
            }
            Err(e) => Err(ConfigError::ReadError(e.to_string())),
        }
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_parent().await?;
        let content = Self::render(config)?;

        // Replace atomically so a failed write never truncates the settings.
        let staging = self.path.with_extension("toml.tmp");
        Self::write(&staging, &content, false)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }

    async fn init(&self) -> Result<(), ConfigError> {
        self.ensure_parent().await?;
        let content = Self::render(&AppConfig::defaults())?;

        Self::write(&self.path, &content, true)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    ConfigError::AlreadyExists(self.path.display().to_string())
                }
                _ => ConfigError::WriteError(e.to_string()),
            })
    }
}
