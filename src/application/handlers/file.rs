//! File resource handler

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use super::HandlerOutput;
use crate::application::error::OperationError;
use crate::application::paginate::{ListEndpoint, PaginationWalker};
use crate::application::ports::{ApiRequest, BinaryStore, HttpMethod, SttApi};
use crate::application::upload::upload_entry;
use crate::domain::input::InputRecord;
use crate::domain::operation::FileOperation;
use crate::domain::transcription::FileId;

pub struct FileHandler<A: SttApi, B: BinaryStore> {
    api: Arc<A>,
    store: Arc<B>,
    walker: PaginationWalker<A>,
}

impl<A: SttApi, B: BinaryStore> FileHandler<A, B> {
    pub fn new(api: Arc<A>, store: Arc<B>) -> Self {
        Self {
            walker: PaginationWalker::new(Arc::clone(&api)),
            api,
            store,
        }
    }

    pub async fn handle(
        &self,
        operation: FileOperation,
        record: &InputRecord,
    ) -> Result<HandlerOutput, OperationError> {
        let params = &record.parameters;

        match operation {
            FileOperation::Upload => {
                let entry = record.media_entry(params.binary_property_or_default())?;
                let uploaded = upload_entry(
                    self.api.as_ref(),
                    self.store.as_ref(),
                    entry,
                    params.file_name(),
                )
                .await?;

                let mut out = Map::new();
                out.insert("fileId".to_string(), json!(uploaded.id));
                out.insert("file_id".to_string(), json!(uploaded.id));
                out.insert("fileName".to_string(), json!(uploaded.file_name));
                if let Some(mime) = &entry.mime_type {
                    out.insert("mimeType".to_string(), json!(mime));
                }
                if let Some(size) = entry.file_size {
                    out.insert("fileSize".to_string(), json!(size));
                }
                out.insert(
                    "uploadedAt".to_string(),
                    json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
                );
                // The raw response is merged in last and wins on key clashes.
                if let Value::Object(response) = uploaded.response {
                    out.extend(response);
                }

                Ok(HandlerOutput::one(Value::Object(out)))
            }
            FileOperation::Get => {
                let id = FileId::parse_opt(params.file_id.as_deref())?;
                let response = self.api.request(ApiRequest::get(format!("/files/{id}"))).await?;
                Ok(HandlerOutput::one(response))
            }
            FileOperation::List => {
                let items = if params.return_all_or_default() {
                    self.walker.collect(HttpMethod::Get, &ListEndpoint::FILES).await?
                } else {
                    self.walker
                        .fetch_page(&ListEndpoint::FILES, params.limit_or_default())
                        .await?
                };
                Ok(HandlerOutput::many(items))
            }
            FileOperation::Delete => {
                let id = FileId::parse_opt(params.file_id.as_deref())?;
                self.api
                    .request(ApiRequest::delete(format!("/files/{id}")))
                    .await?;
                Ok(HandlerOutput::one(json!({ "success": true, "fileId": id })))
            }
        }
    }
}
