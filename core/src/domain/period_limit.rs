//! Send quota and cooldown descriptor.

use cc_shared::config::FlowPolicy;
use std::time::Duration;

/// Limits applied when issuing codes for one session
///
/// `max_count == 0` means the number of sends is unlimited. Without a `window` the
/// count is a lifetime cap. `min_interval` is a cooldown between two consecutive
/// sends and is independent of the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodLimit {
    pub max_count: u32,
    pub window: Option<Duration>,
    pub min_interval: Option<Duration>,
}

impl PeriodLimit {
    /// Cap the number of sends
    pub fn new(max_count: u32) -> Self {
        Self {
            max_count,
            ..Default::default()
        }
    }

    /// Only enforce a cooldown
    pub fn interval_only(min_interval: Duration) -> Self {
        Self {
            min_interval: Some(min_interval),
            ..Default::default()
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = Some(min_interval);
        self
    }

    /// Whether sends are counted against a maximum
    pub fn is_count_limited(&self) -> bool {
        self.max_count > 0
    }

    /// Build the descriptor for a configured flow
    ///
    /// Returns `None` when neither a maximum nor a cooldown is configured. A window
    /// without a maximum has nothing to count and is dropped.
    pub fn from_policy(policy: &FlowPolicy) -> Option<Self> {
        let mut limit: Option<Self> = None;

        if let Some(max_sends) = policy.max_sends {
            let entry = limit.get_or_insert_with(Self::default);
            entry.max_count = max_sends;
            entry.window = policy.window();
        }
        if let Some(interval) = policy.interval() {
            limit.get_or_insert_with(Self::default).min_interval = Some(interval);
        }

        limit
    }
}
