//! Results of sending and verifying codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of issuing a code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOutcome {
    /// Code delivered and stored
    Success,
    /// Quota for the current window is used up
    MaxSendLimit,
    /// Delivery or storage failed; nothing was consumed
    FailInSend,
    /// The sender cannot deliver to this receiver
    NotSupported,
    /// Previous code was sent too recently
    IntervalLimit,
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Success)
    }

    /// Stable numeric code for clients
    pub fn code(&self) -> u16 {
        match self {
            SendOutcome::Success => 0,
            SendOutcome::MaxSendLimit => 11,
            SendOutcome::FailInSend => 12,
            SendOutcome::NotSupported => 13,
            SendOutcome::IntervalLimit => 14,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SendOutcome::Success => "Success | 成功",
            SendOutcome::MaxSendLimit => "Maximum sends exceeded | 超出最大发送次数",
            SendOutcome::FailInSend => "Failed to send | 发送失败",
            SendOutcome::NotSupported => "Receiver not supported | 无法发送",
            SendOutcome::IntervalLimit => "Sent too frequently | 发送间隔时间过短",
        }
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of verifying a code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyOutcome {
    /// Supplied code matches
    Success,
    /// No code is active for the session
    Expired,
    /// Supplied code does not match
    Failed,
    /// Too many wrong attempts; a new code must be issued
    MaxErrorLimit,
}

impl VerifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Success)
    }

    /// Stable numeric code for clients
    pub fn code(&self) -> u16 {
        match self {
            VerifyOutcome::Success => 0,
            VerifyOutcome::Expired => 31,
            VerifyOutcome::Failed => 32,
            VerifyOutcome::MaxErrorLimit => 33,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            VerifyOutcome::Success => "Success | 成功",
            VerifyOutcome::Expired => "Verification code expired | 校验码已过期",
            VerifyOutcome::Failed => "Invalid verification code | 校验失败",
            VerifyOutcome::MaxErrorLimit => {
                "Maximum attempts exceeded. Please request a new code | 超出最大错误次数"
            }
        }
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An unexpired code together with the wrong attempts made against it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveCode {
    pub code: String,
    pub error_count: u32,
}
