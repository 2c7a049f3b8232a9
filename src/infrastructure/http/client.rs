//! Soniox API client adapter
//!
//! Bearer-authenticated JSON and multipart requests over `reqwest`, with
//! per-class timeouts and retry of transient failures.

use std::error::Error as StdError;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::ports::{
    ApiError, ApiRequest, AudioPayload, HttpMethod, RequestBody, SttApi, UploadFile,
};
use crate::domain::config::ApiConfig;

/// Multipart field carrying the audio
const FILE_FIELD: &str = "file";

/// One failed attempt, with what the retry loop needs to know about it
#[derive(Debug)]
struct Failure {
    error: ApiError,
    retryable: bool,
    retry_after: Option<Duration>,
}

impl Failure {
    fn fatal(error: ApiError) -> Self {
        Self {
            error,
            retryable: false,
            retry_after: None,
        }
    }
}

/// Request body as held across attempts
enum PendingBody {
    Empty,
    Json(Value),
    Buffered {
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
    /// Consumed by the first attempt
    Streamed(Option<UploadFile>),
}

impl From<RequestBody> for PendingBody {
    fn from(body: RequestBody) -> Self {
        match body {
            RequestBody::Empty => Self::Empty,
            RequestBody::Json(value) => Self::Json(value),
            RequestBody::Multipart(UploadFile {
                file_name,
                mime_type,
                payload: AudioPayload::Buffer(bytes),
            }) => Self::Buffered {
                file_name,
                mime_type,
                bytes,
            },
            RequestBody::Multipart(file) => Self::Streamed(Some(file)),
        }
    }
}

impl PendingBody {
    fn is_replayable(&self) -> bool {
        !matches!(self, Self::Streamed(_))
    }

    fn attach(&mut self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self {
            Self::Empty => Ok(builder),
            Self::Json(value) => Ok(builder.json(&*value)),
            Self::Buffered {
                file_name,
                mime_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                Ok(builder.multipart(Form::new().part(FILE_FIELD, with_mime(part, mime_type)?)))
            }
            Self::Streamed(slot) => {
                let file = slot
                    .take()
                    .ok_or_else(|| ApiError::Request("upload stream already consumed".to_string()))?;
                let part = match file.payload {
                    AudioPayload::Buffer(bytes) => Part::bytes(bytes),
                    AudioPayload::Stream {
                        stream,
                        length: Some(length),
                    } => Part::stream_with_length(Body::wrap_stream(stream), length),
                    AudioPayload::Stream { stream, length: None } => {
                        Part::stream(Body::wrap_stream(stream))
                    }
                };
                let part = with_mime(part.file_name(file.file_name), &file.mime_type)?;
                Ok(builder.multipart(Form::new().part(FILE_FIELD, part)))
            }
        }
    }
}

fn with_mime(part: Part, mime_type: &str) -> Result<Part, ApiError> {
    part.mime_str(mime_type)
        .map_err(|e| ApiError::Request(format!("invalid MIME type '{mime_type}': {e}")))
}

/// HTTP client for the Soniox async API
pub struct SonioxClient {
    config: Arc<ApiConfig>,
    client: reqwest::Client,
}

impl SonioxClient {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_shared(Arc::new(config))
    }

    pub fn with_shared(config: Arc<ApiConfig>) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn timeout_for(&self, request: &ApiRequest) -> Duration {
        if request.is_upload() {
            self.config.upload_timeout
        } else {
            self.config.request_timeout
        }
    }

    async fn send_once(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(String, String)],
        timeout: Duration,
        body: &mut PendingBody,
    ) -> Result<Value, Failure> {
        let mut builder = self
            .client
            .request(to_reqwest(method), self.config.url(path))
            .bearer_auth(&self.config.api_key)
            .timeout(timeout);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let builder = body.attach(builder).map_err(Failure::fatal)?;

        let response = builder.send().await.map_err(transport_failure)?;
        self.read_response(response).await
    }

    async fn read_response(&self, response: Response) -> Result<Value, Failure> {
        let status = response.status();
        let retry_after = parse_retry_after(&response);
        let text = response.text().await.map_err(transport_failure)?;

        if !status.is_success() {
            let code = status.as_u16();
            return Err(Failure {
                error: ApiError::Status {
                    status: code,
                    message: error_message(&text, status),
                },
                retryable: self.config.retry.is_retryable_status(code),
                retry_after: if status == StatusCode::TOO_MANY_REQUESTS {
                    retry_after
                } else {
                    None
                },
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| Failure::fatal(ApiError::Parse(e.to_string())))
    }
}

#[async_trait]
impl SttApi for SonioxClient {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let timeout = self.timeout_for(&request);
        let ApiRequest {
            method,
            path,
            query,
            body,
        } = request;
        let mut body = PendingBody::from(body);
        let policy = &self.config.retry;
        let mut attempt: u32 = 0;

        loop {
            debug!(%method, path = %path, attempt, "Sending request");
            let failure = match self
                .send_once(method, &path, &query, timeout, &mut body)
                .await
            {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            if !failure.retryable || !body.is_replayable() {
                return Err(failure.error);
            }
            if attempt >= policy.max_retries {
                if attempt == 0 {
                    return Err(failure.error);
                }
                return Err(ApiError::Exhausted {
                    method,
                    path,
                    attempts: attempt + 1,
                    last: Box::new(failure.error),
                });
            }

            let delay = failure
                .retry_after
                .unwrap_or_else(|| policy.backoff(attempt));
            warn!(
                %method,
                path = %path,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %failure.error,
                "Request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn transport_failure(err: reqwest::Error) -> Failure {
    let retryable = err.is_timeout() || err.is_connect() || is_connection_reset(&err);
    Failure {
        error: ApiError::Connection {
            message: describe(&err),
            retryable,
        },
        retryable,
        retry_after: None,
    }
}

/// Whether an io error deep in the source chain reports a dropped connection
fn is_connection_reset(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

/// Error text including its causes
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Numeric `Retry-After` seconds; HTTP dates are ignored
fn parse_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Best human-readable message from an error body
fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        let found = ["message", "error_message", "error", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .filter(|s| !s.trim().is_empty());
        if let Some(message) = found {
            return message.trim().to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_fields() {
        assert_eq!(
            error_message(r#"{"error_message":"bad model","message":""}"#, StatusCode::BAD_REQUEST),
            "bad model"
        );
        assert_eq!(
            error_message(r#"{"message":"Invalid API key"}"#, StatusCode::UNAUTHORIZED),
            "Invalid API key"
        );
    }

    #[test]
    fn error_message_falls_back_to_text_or_reason() {
        assert_eq!(error_message(" upstream down ", StatusCode::BAD_GATEWAY), "upstream down");
        assert_eq!(error_message("", StatusCode::NOT_FOUND), "Not Found");
    }

    #[test]
    fn connection_reset_found_in_chain() {
        #[derive(Debug)]
        struct Wrapper(io::Error);

        impl std::fmt::Display for Wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("wrapped")
            }
        }

        impl StdError for Wrapper {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        let reset = Wrapper(io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(is_connection_reset(&reset));

        let other = Wrapper(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!is_connection_reset(&other));
        assert_eq!(describe(&other), "wrapped: permission denied");
    }

    #[test]
    fn uploads_use_the_upload_timeout() {
        let mut config = ApiConfig::new("key");
        config.request_timeout = Duration::from_secs(7);
        config.upload_timeout = Duration::from_secs(90);
        let client = SonioxClient::new(config);

        assert_eq!(client.timeout_for(&ApiRequest::get("/models")).as_secs(), 7);
        let upload = ApiRequest::upload(
            "/files",
            UploadFile {
                file_name: "a.wav".to_string(),
                mime_type: "audio/wav".to_string(),
                payload: AudioPayload::Buffer(Vec::new()),
            },
        );
        assert_eq!(client.timeout_for(&upload).as_secs(), 90);
    }
}
