//! Speech-to-text API port interface

use std::fmt;
use std::io;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio bytes for an upload.
///
/// A buffer can be replayed on retry; a stream is consumed by the first
/// attempt.
pub enum AudioPayload {
    Buffer(Vec<u8>),
    Stream {
        stream: BoxStream<'static, io::Result<Vec<u8>>>,
        length: Option<u64>,
    },
}

impl fmt::Debug for AudioPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Self::Stream { length, .. } => {
                f.debug_struct("Stream").field("length", length).finish()
            }
        }
    }
}

/// Multipart `file` part of an upload
#[derive(Debug)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub payload: AudioPayload,
}

#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(UploadFile),
}

/// One logical API call
#[derive(Debug)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, RequestBody::Empty)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path, RequestBody::Empty)
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path, RequestBody::Json(body))
    }

    pub fn upload(path: impl Into<String>, file: UploadFile) -> Self {
        Self::new(HttpMethod::Post, path, RequestBody::Multipart(file))
    }

    pub fn new(method: HttpMethod, path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Uploads get the longer timeout class
    pub fn is_upload(&self) -> bool {
        matches!(self.body, RequestBody::Multipart(_))
    }
}

/// API call errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Connection error: {message}")]
    Connection { message: String, retryable: bool },

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("Failed to build request: {0}")]
    Request(String),

    #[error("Unexpected response shape from {context}: {raw}")]
    Malformed { context: String, raw: Value },

    #[error("{method} {path} failed after {attempts} attempts: {last}")]
    Exhausted {
        method: HttpMethod,
        path: String,
        attempts: u32,
        #[source]
        last: Box<ApiError>,
    },
}

impl ApiError {
    /// HTTP status of the underlying failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Exhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// The error the final attempt produced
    pub fn innermost(&self) -> &ApiError {
        match self {
            Self::Exhausted { last, .. } => last.innermost(),
            other => other,
        }
    }
}

/// Port for the authenticated speech-to-text API
#[async_trait]
pub trait SttApi: Send + Sync {
    /// Send a request and return the parsed JSON body.
    ///
    /// An empty body is returned as `Value::Null`.
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_exposes_inner_status() {
        let err = ApiError::Exhausted {
            method: HttpMethod::Get,
            path: "/files".to_string(),
            attempts: 4,
            last: Box::new(ApiError::Status {
                status: 503,
                message: "busy".to_string(),
            }),
        };
        assert_eq!(err.status(), Some(503));
        assert!(matches!(err.innermost(), ApiError::Status { status: 503, .. }));
        assert_eq!(
            err.to_string(),
            "GET /files failed after 4 attempts: API request failed with status 503: busy"
        );
    }

    #[test]
    fn request_builders() {
        let req = ApiRequest::get("/files").with_query("limit", 100);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.query, vec![("limit".to_string(), "100".to_string())]);
        assert!(!req.is_upload());

        let upload = ApiRequest::upload(
            "/files",
            UploadFile {
                file_name: "a.mp3".to_string(),
                mime_type: "audio/mpeg".to_string(),
                payload: AudioPayload::Buffer(vec![1, 2, 3]),
            },
        );
        assert!(upload.is_upload());
    }
}
