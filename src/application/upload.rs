//! Audio upload shared by the file handler and the orchestrator

use serde_json::Value;
use tracing::debug;

use super::error::OperationError;
use super::ports::{ApiRequest, AudioPayload, BinaryStore, SttApi, UploadFile};
use crate::domain::input::{non_blank, BinaryEntry};
use crate::domain::transcription::resource_id;

/// Extension used when nothing better is known
const FALLBACK_EXTENSION: &str = "mp3";

/// Keys an upload response may carry the new file id under
pub const FILE_ID_KEYS: &[&str] = &["id", "file_id"];

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub id: String,
    pub file_name: String,
    pub response: Value,
}

/// Name sent with the upload: explicit, else the source's own, else a
/// timestamped default.
pub fn upload_file_name(explicit: Option<&str>, entry: &BinaryEntry, unix_millis: i64) -> String {
    if let Some(name) = non_blank(explicit).or_else(|| non_blank(entry.file_name.as_deref())) {
        return name.to_string();
    }

    let ext = entry
        .guessed_extension()
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
    format!("audio_{unix_millis}.{ext}")
}

/// Payload for an entry; a stream handle is preferred over a full read
pub async fn load_payload<B: BinaryStore + ?Sized>(
    store: &B,
    entry: &BinaryEntry,
) -> Result<AudioPayload, OperationError> {
    match non_blank(entry.id.as_deref()) {
        Some(id) => Ok(store.open_stream(id).await?),
        None => Ok(AudioPayload::Buffer(store.read_buffer(entry).await?)),
    }
}

/// Upload an entry via `POST /files`
pub async fn upload_entry<A, B>(
    api: &A,
    store: &B,
    entry: &BinaryEntry,
    explicit_name: Option<&str>,
) -> Result<UploadedFile, OperationError>
where
    A: SttApi + ?Sized,
    B: BinaryStore + ?Sized,
{
    let payload = load_payload(store, entry).await?;
    let file_name = upload_file_name(
        explicit_name,
        entry,
        chrono::Utc::now().timestamp_millis(),
    );
    debug!(file_name = %file_name, payload = ?payload, "Uploading audio");

    let response = api
        .request(ApiRequest::upload(
            "/files",
            UploadFile {
                file_name: file_name.clone(),
                mime_type: entry.content_type().to_string(),
                payload,
            },
        ))
        .await?;

    let id = resource_id(&response, FILE_ID_KEYS).ok_or_else(|| OperationError::MissingId {
        context: "File upload failed",
        raw: response.clone(),
    })?;

    Ok(UploadedFile {
        id,
        file_name,
        response,
    })
}
