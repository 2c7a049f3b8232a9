//! Transcription lifecycle tests with scripted ports under paused time

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use soniox_batch::application::ports::{
    ApiError, ApiRequest, AudioPayload, BinaryError, BinaryStore, HttpMethod, RequestBody, SttApi,
};
use soniox_batch::application::{ExecutionLoop, OperationError, TranscribeCallbacks, TranscribeUseCase};
use soniox_batch::domain::input::{BinaryEntry, InputRecord, Parameters, SourceKind};
use soniox_batch::domain::operation::{Operation, Resource, TranscribeMode};
use soniox_batch::domain::PollPolicy;

const FILE_ID: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3301";
const TRANSCRIPTION_ID: &str = "tr-42";

#[derive(Debug, Clone)]
struct Call {
    method: HttpMethod,
    path: String,
    body: Option<Value>,
}

/// Answers from a fixed script: job statuses are served in order, the last
/// one repeating.
struct ScriptedApi {
    statuses: Mutex<VecDeque<Value>>,
    delete_fails: bool,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    fn new(statuses: Vec<Value>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            delete_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_deletes(mut self) -> Self {
        self.delete_fails = true;
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next_status(&self) -> Value {
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses.front().cloned().unwrap_or(Value::Null)
        }
    }
}

#[async_trait]
impl SttApi for ScriptedApi {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let body = match &request.body {
            RequestBody::Json(value) => Some(value.clone()),
            _ => None,
        };
        self.calls.lock().unwrap().push(Call {
            method: request.method,
            path: request.path.clone(),
            body,
        });

        let status_path = format!("/transcriptions/{TRANSCRIPTION_ID}");
        match (request.method, request.path.as_str()) {
            (HttpMethod::Post, "/files") => Ok(json!({ "id": FILE_ID, "filename": "a.mp3" })),
            (HttpMethod::Post, "/transcriptions") => {
                Ok(json!({ "id": TRANSCRIPTION_ID, "status": "queued" }))
            }
            (HttpMethod::Get, path) if path == status_path => Ok(self.next_status()),
            (HttpMethod::Get, path) if path == format!("{status_path}/transcript") => Ok(json!({
                "id": TRANSCRIPTION_ID,
                "text": "hello world",
                "tokens": [{ "text": "hello" }, { "text": " world" }]
            })),
            (HttpMethod::Delete, _) if self.delete_fails => Err(ApiError::Status {
                status: 500,
                message: "delete failed".to_string(),
            }),
            (HttpMethod::Delete, _) => Ok(Value::Null),
            _ => Err(ApiError::Status {
                status: 404,
                message: "not found".to_string(),
            }),
        }
    }
}

struct MemoryStore;

#[async_trait]
impl BinaryStore for MemoryStore {
    async fn open_stream(&self, _id: &str) -> Result<AudioPayload, BinaryError> {
        Ok(AudioPayload::Buffer(b"ID3audio".to_vec()))
    }

    async fn read_buffer(&self, _entry: &BinaryEntry) -> Result<Vec<u8>, BinaryError> {
        Ok(b"ID3audio".to_vec())
    }
}

fn policy() -> PollPolicy {
    PollPolicy::new(Duration::from_secs(5), Duration::from_secs(300))
}

fn use_case(api: &Arc<ScriptedApi>) -> TranscribeUseCase<ScriptedApi, MemoryStore> {
    TranscribeUseCase::new(Arc::clone(api), Arc::new(MemoryStore), policy())
}

fn binary_record() -> InputRecord {
    InputRecord::new(Parameters {
        model: Some("stt-async-v3".to_string()),
        ..Default::default()
    })
    .with_binary(
        "data",
        BinaryEntry {
            id: Some("/audio/a.mp3".to_string()),
            mime_type: Some("audio/mpeg".to_string()),
            file_name: Some("a.mp3".to_string()),
            ..Default::default()
        },
    )
}

fn status(value: &str) -> Value {
    json!({ "id": TRANSCRIPTION_ID, "status": value })
}

fn elapsed_recorder() -> (TranscribeCallbacks, Arc<Mutex<Vec<Duration>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callbacks = TranscribeCallbacks {
        on_poll: Some(Box::new(move |_status, elapsed| {
            sink.lock().unwrap().push(elapsed);
        })),
        ..Default::default()
    };
    (callbacks, seen)
}

#[tokio::test(start_paused = true)]
async fn binary_transcription_completes_after_two_intervals() {
    let api = Arc::new(ScriptedApi::new(vec![
        status("queued"),
        status("processing"),
        status("completed"),
    ]));
    let (callbacks, elapsed) = elapsed_recorder();

    let output = use_case(&api)
        .execute(TranscribeMode::Full, &binary_record(), &callbacks)
        .await
        .unwrap();

    assert_eq!(output.json["text"], "hello world");
    assert_eq!(output.json["status"], "completed");
    assert!(output.json.get("tokens").is_none());

    let elapsed = elapsed.lock().unwrap().clone();
    assert_eq!(elapsed.len(), 3);
    assert!(elapsed[2] >= Duration::from_secs(10) && elapsed[2] < Duration::from_secs(11));

    output.cleanup.expect("uploaded audio is deleted").await.unwrap();
    let calls = api.calls();
    let create = calls
        .iter()
        .find(|c| c.method == HttpMethod::Post && c.path == "/transcriptions")
        .unwrap();
    let body = create.body.as_ref().unwrap();
    assert_eq!(body["file_id"], FILE_ID);
    assert!(body.get("audio_url").is_none());
    assert_eq!(body["model"], "stt-async-v3");
    assert!(calls
        .iter()
        .any(|c| c.method == HttpMethod::Delete && c.path == format!("/files/{FILE_ID}")));
}

#[tokio::test(start_paused = true)]
async fn tokens_are_included_on_request() {
    let api = Arc::new(ScriptedApi::new(vec![status("completed")]));
    let mut record = binary_record();
    record.parameters.options.include_tokens = Some(true);
    record.parameters.options.delete_audio_file = Some(false);

    let output = use_case(&api)
        .execute(TranscribeMode::Full, &record, &TranscribeCallbacks::default())
        .await
        .unwrap();

    assert_eq!(output.json["tokens"].as_array().map(Vec::len), Some(2));
    assert!(output.cleanup.is_none());
}

#[tokio::test(start_paused = true)]
async fn polling_budget_exhaustion_times_out() {
    let api = Arc::new(ScriptedApi::new(vec![status("processing")]));
    let mut record = binary_record();
    record.parameters.options.max_wait_time = Some(12);

    let err = use_case(&api)
        .execute(TranscribeMode::Full, &record, &TranscribeCallbacks::default())
        .await
        .unwrap_err();

    match &err {
        OperationError::TimedOut {
            elapsed_secs,
            last_status,
            transcription_id,
        } => {
            assert_eq!(*elapsed_secs, 12);
            assert_eq!(last_status, "processing");
            assert_eq!(transcription_id, TRANSCRIPTION_ID);
        }
        other => panic!("Expected TimedOut, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains(TRANSCRIPTION_ID));
    assert!(message.contains("processing"));
    assert!(!api.calls().iter().any(|c| c.method == HttpMethod::Delete));
}

#[tokio::test(start_paused = true)]
async fn error_status_fails_the_job() {
    let api = Arc::new(ScriptedApi::new(vec![json!({
        "id": TRANSCRIPTION_ID,
        "status": "error",
        "error_message": "Audio is too short",
        "request_id": "req-9"
    })]));

    let err = use_case(&api)
        .execute(TranscribeMode::Full, &binary_record(), &TranscribeCallbacks::default())
        .await
        .unwrap_err();

    assert!(matches!(err, OperationError::JobFailed { .. }));
    assert_eq!(
        err.to_string(),
        "Transcription failed: Audio is too short (Request ID: req-9)"
    );
}

#[tokio::test(start_paused = true)]
async fn url_source_skips_upload() {
    let api = Arc::new(ScriptedApi::new(vec![status("completed")]));
    let record = InputRecord::new(Parameters {
        model: Some("stt-async-v3".to_string()),
        source: Some(SourceKind::Url),
        file_url: Some("https://example.com/a.mp3".to_string()),
        ..Default::default()
    });

    let output = use_case(&api)
        .execute(TranscribeMode::Full, &record, &TranscribeCallbacks::default())
        .await
        .unwrap();

    assert_eq!(output.json["text"], "hello world");
    assert!(output.cleanup.is_none());
    let calls = api.calls();
    assert!(!calls.iter().any(|c| c.path == "/files"));
    let body = calls[0].body.as_ref().unwrap();
    assert_eq!(body["audio_url"], "https://example.com/a.mp3");
    assert!(body.get("file_id").is_none());
}

#[tokio::test(start_paused = true)]
async fn cleanup_failure_does_not_change_the_result() {
    let api = Arc::new(
        ScriptedApi::new(vec![status("completed")]).failing_deletes(),
    );
    let mut record = binary_record();
    record.parameters.options.delete_transcription = Some(true);

    let output = use_case(&api)
        .execute(TranscribeMode::Full, &record, &TranscribeCallbacks::default())
        .await
        .unwrap();

    assert_eq!(output.json["text"], "hello world");
    output.cleanup.unwrap().await.unwrap();

    let deletes: Vec<String> = api
        .calls()
        .into_iter()
        .filter(|c| c.method == HttpMethod::Delete)
        .map(|c| c.path)
        .collect();
    assert_eq!(
        deletes,
        vec![
            format!("/files/{FILE_ID}"),
            format!("/transcriptions/{TRANSCRIPTION_ID}")
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn submit_only_returns_creation_response() {
    let api = Arc::new(ScriptedApi::new(vec![status("completed")]));
    let record = InputRecord::new(Parameters {
        model: Some("stt-async-v3".to_string()),
        file_id: Some(FILE_ID.to_string()),
        ..Default::default()
    });

    let output = use_case(&api)
        .execute(TranscribeMode::SubmitOnly, &record, &TranscribeCallbacks::default())
        .await
        .unwrap();

    assert_eq!(output.json, json!({ "id": TRANSCRIPTION_ID, "status": "queued" }));
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn submit_and_wait_keeps_the_callers_file() {
    let api = Arc::new(ScriptedApi::new(vec![status("processing"), status("completed")]));
    let mut record = InputRecord::new(Parameters {
        model: Some("stt-async-v3".to_string()),
        file_id: Some(FILE_ID.to_string()),
        ..Default::default()
    });
    record.parameters.options.delete_transcription = Some(true);
    assert!(record.parameters.options.delete_audio_file_or_default());

    let output = use_case(&api)
        .execute(TranscribeMode::SubmitAndWait, &record, &TranscribeCallbacks::default())
        .await
        .unwrap();

    assert_eq!(output.json["text"], "hello world");
    output.cleanup.unwrap().await.unwrap();

    let calls = api.calls();
    assert!(!calls
        .iter()
        .any(|c| c.method == HttpMethod::Post && c.path == "/files"));
    assert!(!calls
        .iter()
        .any(|c| c.method == HttpMethod::Delete && c.path.starts_with("/files")));
    let job_deletes = calls
        .iter()
        .filter(|c| {
            c.method == HttpMethod::Delete
                && c.path == format!("/transcriptions/{TRANSCRIPTION_ID}")
        })
        .count();
    assert_eq!(job_deletes, 1);

    let body = calls[0].body.as_ref().unwrap();
    assert_eq!(body["file_id"], FILE_ID);
    assert!(body.get("audio_url").is_none());
}

#[tokio::test(start_paused = true)]
async fn invalid_file_id_makes_no_calls() {
    let api = Arc::new(ScriptedApi::new(vec![status("completed")]));
    let runner = ExecutionLoop::new(Arc::clone(&api), Arc::new(MemoryStore), policy());
    let record = InputRecord::new(Parameters {
        model: Some("stt-async-v3".to_string()),
        file_id: Some("not-a-uuid".to_string()),
        ..Default::default()
    });

    for name in ["create", "createAndWait", "getByFile"] {
        let operation = Operation::resolve(Resource::Transcription, name).unwrap();
        let err = runner
            .dispatch(operation, &record, &TranscribeCallbacks::default())
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{name}: {err}");
        assert!(err.to_string().contains("not-a-uuid"));
    }

    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_model_makes_no_calls() {
    let api = Arc::new(ScriptedApi::new(vec![status("completed")]));
    let mut record = binary_record();
    record.parameters.model = None;

    let err = use_case(&api)
        .execute(TranscribeMode::Full, &record, &TranscribeCallbacks::default())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn continue_on_fail_isolates_records() {
    let api = Arc::new(ScriptedApi::new(vec![status("completed")]));
    let runner = ExecutionLoop::new(Arc::clone(&api), Arc::new(MemoryStore), policy())
        .continue_on_fail(true);
    let operation = Operation::resolve(Resource::Transcription, "transcribe").unwrap();

    let mut broken = binary_record();
    broken.parameters.model = None;
    let records = vec![broken, binary_record()];

    let batch = runner
        .run(operation, &records, &TranscribeCallbacks::default())
        .await
        .unwrap();

    assert_eq!(batch.records.len(), 2);
    assert!(batch.records[0].is_error());
    assert_eq!(batch.records[1].index, 1);
    assert_eq!(batch.records[1].json["text"], "hello world");
    assert_eq!(batch.pending_cleanup.len(), 1);
}
