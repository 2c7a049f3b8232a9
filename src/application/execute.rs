//! Execution loop over input records

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::error::OperationError;
use super::handlers::{FileHandler, HandlerOutput, ModelHandler, TranscriptionHandler};
use super::ports::{BinaryStore, SttApi};
use super::transcribe::TranscribeCallbacks;
use crate::domain::input::{InputRecord, OutputRecord};
use crate::domain::operation::Operation;
use crate::domain::timing::PollPolicy;

/// Everything produced by a run
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub records: Vec<OutputRecord>,
    /// Background cleanup tasks still in flight
    pub pending_cleanup: Vec<JoinHandle<()>>,
}

impl BatchOutput {
    fn absorb(&mut self, index: usize, output: HandlerOutput) {
        self.records.extend(
            output
                .items
                .into_iter()
                .map(|json| OutputRecord::new(index, json)),
        );
        self.pending_cleanup.extend(output.cleanup);
    }
}

/// A record failed and the run was aborted
#[derive(Debug, Error)]
#[error("Record {index} failed: {source}")]
pub struct BatchError {
    pub index: usize,
    pub source: OperationError,
    /// Output of the records before the failing one
    pub completed: BatchOutput,
}

/// Dispatches records to resource handlers
pub struct ExecutionLoop<A: SttApi + 'static, B: BinaryStore> {
    files: FileHandler<A, B>,
    models: ModelHandler<A>,
    transcriptions: TranscriptionHandler<A, B>,
    continue_on_fail: bool,
}

impl<A: SttApi + 'static, B: BinaryStore> ExecutionLoop<A, B> {
    pub fn new(api: Arc<A>, store: Arc<B>, poll: PollPolicy) -> Self {
        Self {
            files: FileHandler::new(Arc::clone(&api), Arc::clone(&store)),
            models: ModelHandler::new(Arc::clone(&api)),
            transcriptions: TranscriptionHandler::new(api, store, poll),
            continue_on_fail: false,
        }
    }

    /// Turn record failures into `{ "error": message }` outputs instead of aborting
    pub fn continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    pub async fn dispatch(
        &self,
        operation: Operation,
        record: &InputRecord,
        callbacks: &TranscribeCallbacks,
    ) -> Result<HandlerOutput, OperationError> {
        match operation {
            Operation::File(op) => self.files.handle(op, record).await,
            Operation::Model(op) => self.models.handle(op).await,
            Operation::Transcription(op) => {
                self.transcriptions.handle(op, record, callbacks).await
            }
        }
    }

    /// Process records in order
    pub async fn run(
        &self,
        operation: Operation,
        records: &[InputRecord],
        callbacks: &TranscribeCallbacks,
    ) -> Result<BatchOutput, BatchError> {
        let mut batch = BatchOutput::default();

        for (index, record) in records.iter().enumerate() {
            debug!(index, ?operation, "Processing record");
            match self.dispatch(operation, record, callbacks).await {
                Ok(output) => batch.absorb(index, output),
                Err(e) if self.continue_on_fail => {
                    warn!(index, error = %e, "Record failed, continuing");
                    batch.records.push(OutputRecord::error(index, e.to_string()));
                }
                Err(e) => {
                    return Err(BatchError {
                        index,
                        source: e,
                        completed: batch,
                    })
                }
            }
        }

        Ok(batch)
    }
}
