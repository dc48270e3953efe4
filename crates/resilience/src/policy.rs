//! Retry policy configuration
//!
//! Plain serde config: loadable from JSON (or any serde format the host
//! uses), with builder methods for code.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

/// Delay between attempts when none is configured
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// How a retry schedules its attempts.
///
/// `max_attempts: None` means retry forever: only a cancel token or process
/// shutdown ends the loop. That is a deliberate choice by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Fixed wait between a failed attempt and the next one
    pub interval_ms: u64,

    /// Total attempts allowed, the first one included (None = unbounded)
    pub max_attempts: Option<NonZeroU32>,

    /// Per-attempt deadline; an attempt still pending after it counts as failed
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            max_attempts: None,
            attempt_timeout_ms: None,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a policy from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = millis(interval);
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max: NonZeroU32) -> Self {
        self.max_attempts = Some(max);
        self
    }

    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.max_attempts = None;
        self
    }

    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout_ms = Some(millis(timeout));
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout_ms.map(Duration::from_millis)
    }

    /// True once `attempts` has used up the budget
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max.get())
    }
}

/// Whole milliseconds, rounded up so a non-zero duration never becomes zero
fn millis(duration: Duration) -> u64 {
    let whole = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    if duration.subsec_nanos() % 1_000_000 == 0 {
        whole
    } else {
        whole.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.interval(), Duration::from_secs(1));
        assert_eq!(policy.max_attempts, None);
        assert_eq!(policy.attempt_timeout(), None);
        assert!(!policy.is_exhausted(u32::MAX));
    }

    #[test]
    fn test_builder() {
        let policy = RetryPolicy::new()
            .with_interval(Duration::from_millis(250))
            .with_max_attempts(NonZeroU32::new(3).unwrap())
            .with_attempt_timeout(Duration::from_secs(2));

        assert_eq!(policy.interval_ms, 250);
        assert_eq!(policy.attempt_timeout(), Some(Duration::from_secs(2)));
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));

        assert_eq!(policy.unbounded().max_attempts, None);
    }

    #[test]
    fn test_sub_millisecond_durations_round_up() {
        let policy = RetryPolicy::new()
            .with_interval(Duration::from_micros(500))
            .with_attempt_timeout(Duration::from_micros(500));
        assert_eq!(policy.interval(), Duration::from_millis(1));
        assert_eq!(policy.attempt_timeout(), Some(Duration::from_millis(1)));

        let policy = RetryPolicy::new()
            .with_interval(Duration::from_micros(2_001))
            .with_attempt_timeout(Duration::ZERO);
        assert_eq!(policy.interval_ms, 3);
        assert_eq!(policy.attempt_timeout(), Some(Duration::ZERO));
    }

    #[test]
    fn test_from_json() {
        let policy = RetryPolicy::from_json(r#"{ "max_attempts": 5 }"#).unwrap();
        assert_eq!(policy.interval_ms, DEFAULT_INTERVAL_MS);
        assert_eq!(policy.max_attempts, NonZeroU32::new(5));

        let policy =
            RetryPolicy::from_json(r#"{ "interval_ms": 0, "attempt_timeout_ms": 50 }"#).unwrap();
        assert_eq!(policy.interval(), Duration::ZERO);
        assert_eq!(policy.attempt_timeout(), Some(Duration::from_millis(50)));

        // A zero budget is not a policy
        assert!(RetryPolicy::from_json(r#"{ "max_attempts": 0 }"#).is_err());
    }
}
