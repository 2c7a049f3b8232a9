//! Binary payload port interface

use async_trait::async_trait;
use thiserror::Error;

use super::api::AudioPayload;
use crate::domain::input::BinaryEntry;

/// Binary store errors
#[derive(Debug, Clone, Error)]
pub enum BinaryError {
    #[error("Binary data not found: {0}")]
    NotFound(String),

    #[error("Failed to read binary data '{id}': {message}")]
    Read { id: String, message: String },

    #[error("Failed to decode inline binary data: {0}")]
    Decode(String),

    #[error("Binary entry has neither a stream handle nor inline data")]
    Unreadable,
}

/// Port for the host's binary payloads
#[async_trait]
pub trait BinaryStore: Send + Sync {
    /// Open a streaming handle for a stored payload
    async fn open_stream(&self, id: &str) -> Result<AudioPayload, BinaryError>;

    /// Read a payload fully into memory
    async fn read_buffer(&self, entry: &BinaryEntry) -> Result<Vec<u8>, BinaryError>;
}
