//! Transcription resource handler

use std::sync::Arc;

use super::HandlerOutput;
use crate::application::error::OperationError;
use crate::application::paginate::{ListEndpoint, PaginationWalker};
use crate::application::ports::{ApiRequest, BinaryStore, HttpMethod, SttApi};
use crate::application::transcribe::{TranscribeCallbacks, TranscribeUseCase};
use crate::domain::error::ValidationError;
use crate::domain::input::{non_blank, InputRecord};
use crate::domain::operation::{TranscriptionLookup, TranscriptionOperation};
use crate::domain::timing::PollPolicy;
use crate::domain::transcription::FileId;

pub struct TranscriptionHandler<A: SttApi + 'static, B: BinaryStore> {
    api: Arc<A>,
    walker: PaginationWalker<A>,
    transcribe: TranscribeUseCase<A, B>,
}

impl<A: SttApi + 'static, B: BinaryStore> TranscriptionHandler<A, B> {
    pub fn new(api: Arc<A>, store: Arc<B>, poll: PollPolicy) -> Self {
        Self {
            walker: PaginationWalker::new(Arc::clone(&api)),
            transcribe: TranscribeUseCase::new(Arc::clone(&api), store, poll),
            api,
        }
    }

    pub async fn handle(
        &self,
        operation: TranscriptionOperation,
        record: &InputRecord,
        callbacks: &TranscribeCallbacks,
    ) -> Result<HandlerOutput, OperationError> {
        let params = &record.parameters;

        match operation {
            TranscriptionOperation::Transcribe(mode) => {
                let output = self.transcribe.execute(mode, record, callbacks).await?;
                Ok(HandlerOutput {
                    items: vec![output.json],
                    cleanup: output.cleanup,
                })
            }
            TranscriptionOperation::Get(TranscriptionLookup::ById) => {
                let id = non_blank(params.transcription_id.as_deref())
                    .ok_or(ValidationError::MissingField("Transcription ID"))?;
                let response = self
                    .api
                    .request(ApiRequest::get(format!("/transcriptions/{id}")))
                    .await?;
                Ok(HandlerOutput::one(response))
            }
            TranscriptionOperation::Get(TranscriptionLookup::ByFile) => {
                let file_id = FileId::parse_opt(params.file_id.as_deref())?;
                let endpoint = ListEndpoint::TRANSCRIPTIONS;
                let response = self
                    .api
                    .request(ApiRequest::get(endpoint.path).with_query("file_id", &file_id))
                    .await?;

                let items = endpoint.items(&response)?;
                if items.is_empty() {
                    return Err(OperationError::NoTranscriptions {
                        file_id: file_id.into_string(),
                    });
                }
                Ok(HandlerOutput::many(items))
            }
            TranscriptionOperation::List => {
                let items = if params.return_all_or_default() {
                    self.walker
                        .collect(HttpMethod::Get, &ListEndpoint::TRANSCRIPTIONS)
                        .await?
                } else {
                    self.walker
                        .fetch_page(&ListEndpoint::TRANSCRIPTIONS, params.limit_or_default())
                        .await?
                };
                Ok(HandlerOutput::many(items))
            }
        }
    }
}
