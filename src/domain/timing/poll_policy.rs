//! Polling schedule for transcription jobs

use std::time::Duration as StdDuration;

use super::Duration;
use crate::domain::input::{
    MAX_CHECK_INTERVAL_SECS, MAX_MAX_WAIT_SECS, MIN_CHECK_INTERVAL_SECS, MIN_MAX_WAIT_SECS,
};

/// How often and for how long a job is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: StdDuration,
    pub max_wait: StdDuration,
    /// Poll once before the first sleep; short audio is often done by then.
    pub immediate_first_poll: bool,
}

impl PollPolicy {
    pub fn new(interval: StdDuration, max_wait: StdDuration) -> Self {
        Self {
            interval,
            max_wait,
            immediate_first_poll: true,
        }
    }

    /// Build from the per-record `checkInterval`/`maxWaitTime` options
    /// (seconds), falling back to `self` for absent or zero values.
    ///
    /// Overrides are clamped to their accepted ranges, and the interval never
    /// exceeds the budget.
    pub fn with_overrides(self, check_interval_secs: Option<u64>, max_wait_secs: Option<u64>) -> Self {
        let interval = check_interval_secs.filter(|s| *s > 0).map_or(self.interval, |s| {
            StdDuration::from_secs(s.clamp(MIN_CHECK_INTERVAL_SECS, MAX_CHECK_INTERVAL_SECS))
        });
        let max_wait = max_wait_secs.filter(|s| *s > 0).map_or(self.max_wait, |s| {
            StdDuration::from_secs(s.clamp(MIN_MAX_WAIT_SECS, MAX_MAX_WAIT_SECS))
        });

        Self {
            interval: interval.min(max_wait),
            max_wait,
            ..self
        }
    }

    /// Sleep before the next poll, cut short so the budget ends on time
    pub fn next_sleep(&self, elapsed: StdDuration) -> StdDuration {
        self.interval.min(self.max_wait.saturating_sub(elapsed))
    }

    /// Whether the sleep before poll number `poll` (0-based) should happen
    pub fn sleeps_before(&self, poll: u32) -> bool {
        poll > 0 || !self.immediate_first_poll
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(
            Duration::default_check_interval().as_std(),
            Duration::default_max_wait().as_std(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, StdDuration::from_secs(5));
        assert_eq!(policy.max_wait, StdDuration::from_secs(300));
        assert!(policy.immediate_first_poll);
    }

    #[test]
    fn first_poll_is_immediate_by_default() {
        let policy = PollPolicy::default();
        assert!(!policy.sleeps_before(0));
        assert!(policy.sleeps_before(1));

        let delayed = PollPolicy {
            immediate_first_poll: false,
            ..policy
        };
        assert!(delayed.sleeps_before(0));
    }

    #[test]
    fn overrides_ignore_zero_and_missing() {
        let policy = PollPolicy::default().with_overrides(Some(2), Some(0));
        assert_eq!(policy.interval, StdDuration::from_secs(2));
        assert_eq!(policy.max_wait, StdDuration::from_secs(300));

        let untouched = PollPolicy::default().with_overrides(None, None);
        assert_eq!(untouched, PollPolicy::default());
    }

    #[test]
    fn overrides_are_clamped_to_accepted_ranges() {
        let policy = PollPolicy::default().with_overrides(Some(100_000), Some(1));
        assert_eq!(policy.max_wait, StdDuration::from_secs(MIN_MAX_WAIT_SECS));
        assert_eq!(policy.interval, StdDuration::from_secs(MIN_MAX_WAIT_SECS));

        let policy = PollPolicy::default().with_overrides(Some(100_000), Some(100_000));
        assert_eq!(policy.interval, StdDuration::from_secs(MAX_CHECK_INTERVAL_SECS));
        assert_eq!(policy.max_wait, StdDuration::from_secs(MAX_MAX_WAIT_SECS));

        let policy = PollPolicy::default().with_overrides(Some(1), Some(10));
        assert_eq!(policy.interval, StdDuration::from_secs(1));
        assert_eq!(policy.max_wait, StdDuration::from_secs(10));
    }

    #[test]
    fn interval_never_exceeds_budget() {
        let policy = PollPolicy::new(StdDuration::from_secs(60), StdDuration::from_secs(300))
            .with_overrides(None, Some(20));
        assert_eq!(policy.interval, StdDuration::from_secs(20));
    }

    #[test]
    fn next_sleep_stops_at_the_deadline() {
        let policy = PollPolicy::new(StdDuration::from_secs(5), StdDuration::from_secs(12));
        assert_eq!(policy.next_sleep(StdDuration::from_secs(0)), StdDuration::from_secs(5));
        assert_eq!(policy.next_sleep(StdDuration::from_secs(10)), StdDuration::from_secs(2));
        assert_eq!(policy.next_sleep(StdDuration::from_secs(15)), StdDuration::ZERO);
    }
}
