//! Transcription domain module

mod context;
mod file_id;
mod job;
mod media;
mod request;
mod response;

pub use context::{split_list, ContextBlock, ContextEntry, TranslationTerm};
pub use file_id::FileId;
pub use job::{JobFailure, JobStatus};
pub use media::{is_media_mime, MediaType};
pub use request::{
    AudioHandle, TranscriptionRequest, TranslationSpec, WebhookSpec, AUDIO_SOURCE_KEYS,
};
pub use response::{item_list, next_cursor, resource_id, Normalized, PageCursor, NEXT_PAGE_CURSOR_KEY};
