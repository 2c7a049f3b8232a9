//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod api;
pub mod binary;
pub mod config;

// Re-export common types
pub use api::{
    ApiError, ApiRequest, AudioPayload, HttpMethod, RequestBody, SttApi, UploadFile,
};
pub use binary::{BinaryError, BinaryStore};
pub use config::ConfigStore;
