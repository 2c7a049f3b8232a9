//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 5s, 5m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a resource or operation name is not recognized
#[derive(Debug, Clone, Error)]
pub enum UnknownOperationError {
    #[error("Invalid resource: \"{input}\". Valid resources are: file, transcription, model")]
    Resource { input: String },

    #[error("Invalid operation \"{input}\" for resource \"{resource}\". Valid operations are: {valid}")]
    Operation {
        resource: String,
        input: String,
        valid: String,
    },
}

/// Input validation failures, raised before any network call is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Model is required. Please select a model (see 'model list').")]
    MissingModel,

    #[error("File ID must be a valid UUID. Received: \"{input}\". Please use the file_id from the File Upload operation.")]
    InvalidFileId { input: String },

    #[error("No binary data exists on input item. Provide audio data in property \"{property}\".")]
    NoBinaryData { property: String },

    #[error("Binary property \"{property}\" not found. Available: {available}")]
    MissingBinaryProperty { property: String, available: String },

    #[error("Invalid file type: {mime_type}. Only audio and video files are supported (e.g., audio/mp3, video/mp4).")]
    UnsupportedMimeType { mime_type: String },

    #[error("Neither file_id nor audio_url present in request body.")]
    MissingAudioSource,

    #[error("Both file_id and audio_url present in request body; exactly one is allowed.")]
    ConflictingAudioSource,

    #[error("Failed to serialize request body: {0}")]
    RequestBody(String),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
