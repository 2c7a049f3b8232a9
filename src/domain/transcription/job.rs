//! Remote transcription job status

use std::fmt;

use serde_json::Value;

/// Job status as reported by the API.
///
/// Unrecognized strings are kept verbatim and treated as still pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
    Unknown(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => Self::Queued,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "error" => Self::Error,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Status carried by a job response; a missing field counts as unknown
    pub fn from_response(response: &Value) -> Self {
        match response.get("status").and_then(Value::as_str) {
            Some(raw) => Self::parse(raw),
            None => Self::Unknown(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(raw) if raw.is_empty() => f.write_str("unknown"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Failure details of a job in `error` status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub message: String,
    pub request_id: Option<String>,
}

impl JobFailure {
    /// Message priority: `message`, `error_message`, `error_type`, then a
    /// generic fallback.
    pub fn from_response(response: &Value) -> Self {
        let field = |key: &str| {
            response
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let message = field("message")
            .or_else(|| field("error_message"))
            .or_else(|| field("error_type"))
            .unwrap_or_else(|| "Unknown error".to_string());

        Self {
            message,
            request_id: field("request_id"),
        }
    }
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(id) = &self.request_id {
            write!(f, " (Request ID: {id})")?;
        }
        Ok(())
    }
}
