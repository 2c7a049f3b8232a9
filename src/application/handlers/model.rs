//! Model resource handler

use std::sync::Arc;

use super::HandlerOutput;
use crate::application::error::OperationError;
use crate::application::paginate::ListEndpoint;
use crate::application::ports::{ApiRequest, SttApi};
use crate::domain::operation::ModelOperation;

pub struct ModelHandler<A: SttApi> {
    api: Arc<A>,
}

impl<A: SttApi> ModelHandler<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn handle(&self, operation: ModelOperation) -> Result<HandlerOutput, OperationError> {
        match operation {
            ModelOperation::List => {
                let endpoint = ListEndpoint::MODELS;
                let response = self.api.request(ApiRequest::get(endpoint.path)).await?;
                Ok(HandlerOutput::many(endpoint.items(&response)?))
            }
        }
    }
}
