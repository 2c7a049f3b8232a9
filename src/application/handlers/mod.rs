//! Per-resource operation handlers

mod file;
mod model;
mod transcription;

use serde_json::Value;
use tokio::task::JoinHandle;

pub use file::FileHandler;
pub use model::ModelHandler;
pub use transcription::TranscriptionHandler;

/// JSON items produced for one input record
#[derive(Debug, Default)]
pub struct HandlerOutput {
    pub items: Vec<Value>,
    /// Detached cleanup started while handling the record
    pub cleanup: Option<JoinHandle<()>>,
}

impl HandlerOutput {
    pub fn one(item: Value) -> Self {
        Self {
            items: vec![item],
            cleanup: None,
        }
    }

    pub fn many(items: Vec<Value>) -> Self {
        Self {
            items,
            cleanup: None,
        }
    }
}
