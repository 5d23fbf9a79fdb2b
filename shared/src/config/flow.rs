//! Per-flow verification code settings
//!
//! A flow is one `(sender identity, business flag)` pair. Every flow is configured
//! under its composite key `"{sender}_{business}"`, for example `sms_login`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// How the code lifetime is written into rendered message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeDisplay {
    /// Minutes when the lifetime is a whole number of minutes, hours when a whole
    /// number of hours, seconds otherwise
    Auto,
    /// Whole seconds
    #[default]
    Seconds,
    /// Fractional minutes
    Minutes,
    /// Fractional hours
    Hours,
}

/// Settings for a single flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FlowPolicy {
    /// Maximum sends allowed within the quota window
    #[serde(default)]
    pub max_sends: Option<u32>,

    /// Quota window length in seconds; without it `max_sends` is a lifetime cap
    #[serde(default)]
    pub window_seconds: Option<u64>,

    /// Minimum spacing between two sends in seconds
    #[serde(default)]
    pub interval_seconds: Option<u64>,

    /// Lifetime of an issued code in seconds
    #[serde(default)]
    pub code_ttl_seconds: Option<u64>,

    /// Wrong attempts tolerated before the code locks
    #[serde(default)]
    pub max_errors: Option<u32>,

    /// Message template with `{receiver}`, `{business}`, `{code}`, `{ttl}`, `{sender}` placeholders
    #[serde(default)]
    pub template: Option<String>,
}

impl FlowPolicy {
    pub fn window(&self) -> Option<Duration> {
        self.window_seconds.map(Duration::from_secs)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval_seconds.map(Duration::from_secs)
    }

    pub fn code_ttl(&self) -> Option<Duration> {
        self.code_ttl_seconds.map(Duration::from_secs)
    }
}

/// Settings for every flow served by one resolver
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FlowSettings {
    /// How `{ttl}` is rendered in templates
    #[serde(default)]
    pub time_display: TimeDisplay,

    /// Keep separate code and quota records per sender for the same receiver and business
    #[serde(default)]
    pub isolate_senders: bool,

    /// Flow policies keyed by `"{sender}_{business}"`
    #[serde(default)]
    pub flows: HashMap<String, FlowPolicy>,
}

impl FlowSettings {
    /// Look up the policy registered under a composite key
    pub fn policy(&self, composite_key: &str) -> Option<&FlowPolicy> {
        self.flows.get(composite_key)
    }

    /// Register or replace a policy, returning `self` for chaining
    pub fn with_flow(mut self, composite_key: impl Into<String>, policy: FlowPolicy) -> Self {
        self.flows.insert(composite_key.into(), policy);
        self
    }
}
