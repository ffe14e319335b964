use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;
pub const DEFAULT_MAX_PENDING: usize = 10_000;

/// Knobs for a single crawl invocation.
///
/// Every field has a default, so partial documents deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Maximum number of pages that may be fetched successfully.
    pub max_pages: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Pause after each successful fetch, in milliseconds.
    pub delay_ms: u64,
    /// Back off exponentially after consecutive fetch failures.
    pub backoff_on_failure: bool,
    /// Upper bound for a backed-off pause, in milliseconds.
    pub max_delay_ms: u64,
    /// Cap on the pending queue; discoveries beyond it are dropped.
    pub max_pending: usize,
    /// Wall-clock limit for the whole crawl, in seconds.
    pub deadline_secs: Option<u64>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            delay_ms: DEFAULT_DELAY_MS,
            backoff_on_failure: false,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            max_pending: DEFAULT_MAX_PENDING,
            deadline_secs: None,
        }
    }
}

impl CrawlSettings {
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_backoff(mut self, backoff_on_failure: bool) -> Self {
        self.backoff_on_failure = backoff_on_failure;
        self
    }

    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    pub fn with_deadline(mut self, deadline_secs: Option<u64>) -> Self {
        self.deadline_secs = deadline_secs;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Pause to apply after the given number of consecutive failures.
    ///
    /// Zero failures means the plain politeness delay. Without backoff a
    /// failure never pauses.
    pub fn pause_after(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return self.delay();
        }
        if !self.backoff_on_failure {
            return Duration::ZERO;
        }

        let factor = 2u64.saturating_pow(consecutive_failures);
        let backed_off = self.delay_ms.saturating_mul(factor);
        Duration::from_millis(backed_off.min(self.max_delay_ms))
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}
