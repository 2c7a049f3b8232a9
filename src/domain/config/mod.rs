//! Configuration domain module

mod api_config;
mod app_config;

pub use api_config::ApiConfig;
pub use app_config::{AppConfig, DEFAULT_API_URL};
