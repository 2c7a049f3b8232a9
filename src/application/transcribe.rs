//! Transcription lifecycle use case
//!
//! Drives one transcription request through
//! `Building -> Uploading -> Submitting -> Polling -> Completed`, ending in
//! `Failed` or `TimedOut` otherwise. Cleanup of server-side resources runs
//! in a detached task once the result is in hand.

use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::error::OperationError;
use super::ports::{ApiRequest, BinaryStore, SttApi};
use super::upload::upload_entry;
use crate::domain::error::ValidationError;
use crate::domain::input::{non_blank, BinaryEntry, InputRecord, SourceKind};
use crate::domain::operation::TranscribeMode;
use crate::domain::timing::PollPolicy;
use crate::domain::transcription::{
    resource_id, AudioHandle, FileId, JobFailure, JobStatus, TranscriptionRequest,
};

/// Keys a creation response may carry the job id under
const TRANSCRIPTION_ID_KEYS: &[&str] = &["transcription_id", "id"];

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Building,
    Uploading,
    Submitting,
    Polling,
    Completed,
    Failed,
    TimedOut,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Building => "Building request",
            Self::Uploading => "Uploading audio",
            Self::Submitting => "Creating transcription",
            Self::Polling => "Waiting for transcription",
            Self::Completed => "Transcription complete",
            Self::Failed => "Transcription failed",
            Self::TimedOut => "Transcription timed out",
        };
        f.write_str(label)
    }
}

/// Callbacks for progress and status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct TranscribeCallbacks {
    /// Called on every stage transition
    pub on_stage: Option<Box<dyn Fn(Stage) + Send + Sync>>,
    /// Called after each status poll with (status, elapsed)
    pub on_poll: Option<Box<dyn Fn(&JobStatus, StdDuration) + Send + Sync>>,
}

impl TranscribeCallbacks {
    fn stage(&self, stage: Stage) {
        if let Some(ref cb) = self.on_stage {
            cb(stage);
        }
    }

    fn poll(&self, status: &JobStatus, elapsed: StdDuration) {
        if let Some(ref cb) = self.on_poll {
            cb(status, elapsed);
        }
    }
}

/// Output from the transcribe use case
#[derive(Debug)]
pub struct TranscribeOutput {
    /// Final job response with `text` (and `tokens` when requested), or the
    /// creation response in submit-only mode
    pub json: Value,
    /// Background deletion of server-side resources, if any was scheduled
    pub cleanup: Option<JoinHandle<()>>,
}

/// Audio the orchestrator works from
enum Audio<'a> {
    Binary(&'a BinaryEntry),
    Url(String),
    Existing(FileId),
}

pub struct TranscribeUseCase<A, B>
where
    A: SttApi + 'static,
    B: BinaryStore,
{
    api: Arc<A>,
    store: Arc<B>,
    poll: PollPolicy,
}

impl<A, B> TranscribeUseCase<A, B>
where
    A: SttApi + 'static,
    B: BinaryStore,
{
    pub fn new(api: Arc<A>, store: Arc<B>, poll: PollPolicy) -> Self {
        Self { api, store, poll }
    }

    /// Run the lifecycle for one record
    pub async fn execute(
        &self,
        mode: TranscribeMode,
        record: &InputRecord,
        callbacks: &TranscribeCallbacks,
    ) -> Result<TranscribeOutput, OperationError> {
        let result = self.run(mode, record, callbacks).await;
        match &result {
            Ok(_) => callbacks.stage(Stage::Completed),
            Err(OperationError::TimedOut { .. }) => callbacks.stage(Stage::TimedOut),
            Err(_) => callbacks.stage(Stage::Failed),
        }
        result
    }

    async fn run(
        &self,
        mode: TranscribeMode,
        record: &InputRecord,
        callbacks: &TranscribeCallbacks,
    ) -> Result<TranscribeOutput, OperationError> {
        let params = &record.parameters;

        callbacks.stage(Stage::Building);
        let audio = match mode {
            TranscribeMode::Full => match params.source_or_default() {
                SourceKind::Binary => {
                    Audio::Binary(record.media_entry(params.binary_property_or_default())?)
                }
                SourceKind::Url => Audio::Url(
                    non_blank(params.file_url.as_deref())
                        .ok_or(ValidationError::MissingField("Audio URL"))?
                        .to_string(),
                ),
            },
            TranscribeMode::SubmitOnly | TranscribeMode::SubmitAndWait => {
                Audio::Existing(FileId::parse_opt(params.file_id.as_deref())?)
            }
        };
        if non_blank(params.model.as_deref()).is_none() {
            return Err(ValidationError::MissingModel.into());
        }

        let mut uploaded: Option<FileId> = None;
        let handle = match audio {
            Audio::Binary(entry) => {
                callbacks.stage(Stage::Uploading);
                let file = upload_entry(
                    self.api.as_ref(),
                    self.store.as_ref(),
                    entry,
                    params.file_name(),
                )
                .await?;
                info!(file_id = %file.id, file_name = %file.file_name, "Uploaded audio");
                let id = FileId::from_api(file.id);
                uploaded = Some(id.clone());
                AudioHandle::FileId(id)
            }
            Audio::Url(url) => AudioHandle::AudioUrl(url),
            Audio::Existing(id) => AudioHandle::FileId(id),
        };

        callbacks.stage(Stage::Submitting);
        let request = TranscriptionRequest::build(
            params.model.as_deref(),
            handle,
            &params.additional_fields,
        )?;
        let created = self
            .api
            .request(ApiRequest::post_json("/transcriptions", request.to_body()?))
            .await?;

        if mode == TranscribeMode::SubmitOnly {
            return Ok(TranscribeOutput {
                json: created,
                cleanup: None,
            });
        }

        let transcription_id = resource_id(&created, TRANSCRIPTION_ID_KEYS).ok_or_else(|| {
            OperationError::MissingId {
                context: "Failed to create transcription",
                raw: created.clone(),
            }
        })?;
        info!(transcription_id = %transcription_id, "Created transcription");

        callbacks.stage(Stage::Polling);
        let options = &params.options;
        let policy = self
            .poll
            .with_overrides(options.check_interval, options.max_wait_time);
        let json = self
            .wait_for_result(
                &transcription_id,
                policy,
                options.include_tokens_or_default(),
                callbacks,
            )
            .await?;

        let mut targets = Vec::new();
        if options.delete_audio_file_or_default() {
            if let Some(id) = uploaded {
                targets.push(format!("/files/{id}"));
            }
        }
        if options.delete_transcription_or_default() {
            targets.push(format!("/transcriptions/{transcription_id}"));
        }

        Ok(TranscribeOutput {
            json,
            cleanup: self.spawn_cleanup(targets),
        })
    }

    /// Poll until the job completes, fails or the budget runs out
    async fn wait_for_result(
        &self,
        transcription_id: &str,
        policy: PollPolicy,
        include_tokens: bool,
        callbacks: &TranscribeCallbacks,
    ) -> Result<Value, OperationError> {
        let started = Instant::now();
        let status_path = format!("/transcriptions/{transcription_id}");
        let mut last_status = JobStatus::Unknown(String::new());
        let mut poll = 0u32;

        while started.elapsed() < policy.max_wait {
            if policy.sleeps_before(poll) {
                tokio::time::sleep(policy.next_sleep(started.elapsed())).await;
            }
            poll += 1;

            let response = self.api.request(ApiRequest::get(&status_path)).await?;
            last_status = JobStatus::from_response(&response);
            debug!(transcription_id, status = %last_status, poll, "Polled transcription");
            callbacks.poll(&last_status, started.elapsed());

            match last_status {
                JobStatus::Completed => {
                    let transcript = self
                        .api
                        .request(ApiRequest::get(format!("{status_path}/transcript")))
                        .await?;
                    return Ok(merge_transcript(response, &transcript, include_tokens));
                }
                JobStatus::Error => {
                    return Err(OperationError::JobFailed {
                        failure: JobFailure::from_response(&response),
                        transcription_id: transcription_id.to_string(),
                    });
                }
                _ => {}
            }
        }

        Err(OperationError::TimedOut {
            elapsed_secs: started.elapsed().as_secs(),
            last_status: last_status.to_string(),
            transcription_id: transcription_id.to_string(),
        })
    }

    /// Delete the given paths in a detached task. Failures are logged only.
    fn spawn_cleanup(&self, paths: Vec<String>) -> Option<JoinHandle<()>> {
        if paths.is_empty() {
            return None;
        }

        let api = Arc::clone(&self.api);
        Some(tokio::spawn(async move {
            for path in paths {
                match api.request(ApiRequest::delete(&path)).await {
                    Ok(_) => debug!(path = %path, "Cleaned up"),
                    Err(e) => warn!(path = %path, error = %e, "Cleanup failed"),
                }
            }
        }))
    }
}

/// Status response fields plus `text`, and `tokens` when requested
fn merge_transcript(status: Value, transcript: &Value, include_tokens: bool) -> Value {
    let mut result = match status {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let text = transcript
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default();
    result.insert("text".to_string(), Value::String(text.to_string()));

    if include_tokens {
        if let Some(tokens) = transcript.get("tokens").filter(|t| !t.is_null()) {
            result.insert("tokens".to_string(), tokens.clone());
        }
    }

    Value::Object(result)
}
