//! Domain layer - Core business logic
//!
//! Contains value objects, request shaping, response normalization and
//! domain errors. This layer performs no I/O.

pub mod config;
pub mod error;
pub mod input;
pub mod operation;
pub mod timing;
pub mod transcription;

// Re-export common types
pub use config::{ApiConfig, AppConfig};
pub use error::*;
pub use input::{BinaryEntry, InputRecord, OutputRecord, Parameters};
pub use operation::{Operation, Resource};
pub use timing::{Duration, PollPolicy, RetryPolicy};
