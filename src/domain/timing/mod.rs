//! Timing domain module: durations, retry and polling schedules

mod duration;
mod poll_policy;
mod retry_policy;

pub use duration::{
    Duration, DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_MAX_WAIT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_UPLOAD_TIMEOUT_SECS,
};
pub use poll_policy::PollPolicy;
pub use retry_policy::{RetryPolicy, DEFAULT_MAX_RETRIES, RETRYABLE_STATUS_CODES};
