//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default interval between job status checks (5 seconds)
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 5;

/// Default polling budget for a transcription job (5 minutes)
pub const DEFAULT_MAX_WAIT_SECS: u64 = 300;

/// Default timeout for ordinary API calls (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default timeout for file uploads (60 seconds)
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 60;

/// Value object representing a configured time span.
/// Immutable and validated on creation; never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    pub const fn default_check_interval() -> Self {
        Self::from_secs(DEFAULT_CHECK_INTERVAL_SECS)
    }

    pub const fn default_max_wait() -> Self {
        Self::from_secs(DEFAULT_MAX_WAIT_SECS)
    }

    pub const fn default_request_timeout() -> Self {
        Self::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub const fn default_upload_timeout() -> Self {
        Self::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS)
    }

    /// Get duration in whole seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse strings such as "5s", "5m", "2m30s".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let invalid = || DurationParseError {
            input: s.to_string(),
        };

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut digits = String::new();
        let mut seen_seconds = false;
        let mut found_any = false;

        for ch in input.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                // Minutes must come before seconds ("30s2m" is rejected).
                'm' if !digits.is_empty() && !found_any => {
                    minutes = digits.parse().map_err(|_| invalid())?;
                    digits.clear();
                    found_any = true;
                }
                's' if !digits.is_empty() && !seen_seconds => {
                    seconds = digits.parse().map_err(|_| invalid())?;
                    digits.clear();
                    seen_seconds = true;
                    found_any = true;
                }
                _ => return Err(invalid()),
            }
        }

        if !digits.is_empty() || !found_any {
            return Err(invalid());
        }

        let total_ms = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .and_then(|secs| secs.checked_mul(1000))
            .ok_or_else(invalid)?;

        if total_ms == 0 {
            return Err(invalid());
        }

        Ok(Self {
            milliseconds: total_ms,
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if self.milliseconds < 1000 {
            write!(f, "{}ms", self.milliseconds)
        } else if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

impl From<Duration> for StdDuration {
    fn from(d: Duration) -> Self {
        d.as_std()
    }
}
