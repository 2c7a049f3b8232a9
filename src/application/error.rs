//! Errors raised while executing an operation

use serde_json::Value;
use thiserror::Error;

use super::ports::{ApiError, BinaryError};
use crate::domain::error::ValidationError;
use crate::domain::transcription::JobFailure;

/// Errors from resource handlers and the transcription orchestrator
#[derive(Debug, Clone, Error)]
pub enum OperationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Binary(#[from] BinaryError),

    #[error("{context}: API did not return an id. Response: {raw}")]
    MissingId { context: &'static str, raw: Value },

    #[error("Transcription failed: {failure}")]
    JobFailed {
        failure: JobFailure,
        transcription_id: String,
    },

    #[error("Transcription timeout after {elapsed_secs}s. Status: {last_status}. ID: {transcription_id}")]
    TimedOut {
        elapsed_secs: u64,
        last_status: String,
        transcription_id: String,
    },

    #[error("No transcriptions found for file ID: {file_id}. Make sure the transcription has been created.")]
    NoTranscriptions { file_id: String },
}

impl OperationError {
    /// True when the failure was detected before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
