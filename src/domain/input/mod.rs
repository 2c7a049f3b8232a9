//! Input domain module: per-record parameters and binary payload metadata

mod parameters;
mod record;

pub use parameters::{
    non_blank, AdditionalFields, Parameters, SourceKind, WaitOptions, DEFAULT_BINARY_PROPERTY,
    DEFAULT_LIST_LIMIT, MAX_CHECK_INTERVAL_SECS, MAX_LIST_LIMIT, MAX_MAX_WAIT_SECS,
    MIN_CHECK_INTERVAL_SECS, MIN_MAX_WAIT_SECS,
};
pub use record::{BinaryEntry, InputRecord, OutputRecord};
