//! Bounded polling for page conditions.
//!
//! Every browser interaction waits for its target with a fixed timeout
//! instead of sleeping for an arbitrary delay. The loops themselves live in
//! the session; this module provides the clock they poll against.

use crate::locator::LocatorOptions;
use std::time::Duration;
use tokio::time::Instant;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::from(LocatorOptions::DEFAULT)
    }
}

impl From<LocatorOptions> for WaitOptions {
    fn from(options: LocatorOptions) -> Self {
        Self {
            timeout_ms: options.timeout.as_millis() as u64,
            poll_interval_ms: options.poll_interval.as_millis() as u64,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Result of a wait operation
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of probes made
    pub attempts: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Deadline tracker for one wait loop.
///
/// A probe is always attempted at least once, even with a zero timeout.
#[derive(Debug)]
pub struct Poller {
    start: Instant,
    options: WaitOptions,
    attempts: u32,
}

impl Poller {
    /// Start the clock
    #[must_use]
    pub fn start(options: WaitOptions) -> Self {
        Self {
            start: Instant::now(),
            options,
            attempts: 0,
        }
    }

    /// Record a probe; returns false once the deadline has passed
    pub fn attempt(&mut self) -> bool {
        self.attempts += 1;
        self.attempts == 1 || self.start.elapsed() < self.options.timeout()
    }

    /// Whether another probe would still be inside the deadline
    #[must_use]
    pub fn has_time_left(&self) -> bool {
        self.start.elapsed() < self.options.timeout()
    }

    /// Sleep for one polling interval
    pub async fn tick(&self) {
        tokio::time::sleep(self.options.poll_interval()).await;
    }

    /// Summary of the finished wait
    #[must_use]
    pub fn finish(&self, waited_for: impl Into<String>) -> WaitResult {
        WaitResult {
            elapsed: self.start.elapsed(),
            attempts: self.attempts,
            waited_for: waited_for.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_default_matches_locator_defaults() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, 10_000);
            assert_eq!(opts.poll_interval_ms, 100);
        }

        #[test]
        fn test_builders() {
            let opts = WaitOptions::new().with_timeout(500).with_poll_interval(10);
            assert_eq!(opts.timeout(), Duration::from_millis(500));
            assert_eq!(opts.poll_interval(), Duration::from_millis(10));
        }
    }

    mod poller_tests {
        use super::*;

        #[tokio::test]
        async fn test_zero_timeout_still_probes_once() {
            let mut poller = Poller::start(WaitOptions::new().with_timeout(0));
            assert!(poller.attempt());
            assert!(!poller.attempt());
        }

        #[tokio::test]
        async fn test_deadline_expires() {
            let mut poller =
                Poller::start(WaitOptions::new().with_timeout(20).with_poll_interval(5));
            let mut probes = 0;
            while poller.attempt() {
                probes += 1;
                poller.tick().await;
            }
            assert!(probes >= 2);
            let result = poller.finish("nothing");
            assert!(result.elapsed >= Duration::from_millis(20));
            assert_eq!(result.waited_for, "nothing");
        }
    }
}
