//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod error;
pub mod execute;
pub mod handlers;
pub mod paginate;
pub mod ports;
pub mod transcribe;
pub mod upload;

// Re-export use cases
pub use error::OperationError;
pub use execute::{BatchError, BatchOutput, ExecutionLoop};
pub use paginate::{ListEndpoint, PaginationWalker, PAGE_SIZE};
pub use transcribe::{Stage, TranscribeCallbacks, TranscribeOutput, TranscribeUseCase};
