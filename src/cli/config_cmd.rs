//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::timing::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.location().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;
    validate_config_value(key, value)?;

    store.update(|config| apply(config, key, value)).await?;
    presenter.success(&format!("{} = {}", key, display_value(key, value)));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    match lookup(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = lookup(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.location().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Displayable value of a key, with the API key masked
fn lookup(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "api_url" => config.api_url.clone(),
        "model" => config.model.clone(),
        "check_interval" => config.check_interval.clone(),
        "max_wait" => config.max_wait.clone(),
        "request_timeout" => config.request_timeout.clone(),
        "upload_timeout" => config.upload_timeout.clone(),
        "max_retries" => config.max_retries.map(|n| n.to_string()),
        _ => None,
    }
}

fn apply(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim().to_string();
    match key {
        "api_key" => config.api_key = Some(value),
        "api_url" => config.api_url = Some(value.trim_end_matches('/').to_string()),
        "model" => config.model = Some(value),
        "check_interval" => config.check_interval = Some(value),
        "max_wait" => config.max_wait = Some(value),
        "request_timeout" => config.request_timeout = Some(value),
        "upload_timeout" => config.upload_timeout = Some(value),
        "max_retries" => config.max_retries = Some(parse_retries(key, &value)?),
        _ => {
            return Err(ConfigError::ValidationError {
                key: key.to_string(),
                message: "Unknown key".to_string(),
            })
        }
    }
    Ok(())
}

fn display_value(key: &str, value: &str) -> String {
    if key == "api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "check_interval" | "max_wait" | "request_timeout" | "upload_timeout" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "max_retries" => {
            parse_retries(key, value)?;
        }
        "api_url" => {
            let value = value.trim();
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(invalid(format!(
                    "Invalid value '{}'. Expected an http(s) URL",
                    value
                )));
            }
        }
        "api_key" | "model" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_retries(key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be a non-negative integer".to_string(),
        })
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
