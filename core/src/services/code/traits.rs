//! Contracts for code storage backends and code senders

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::domain::EffectiveCode;
use crate::errors::StorageError;

/// Keyed store for code records and quota records
///
/// Every session is addressed by `(receiver, business)`. Implementations must keep
/// the code record and the quota record of one session apart, and must honor:
/// - `set_code` replaces code, error count and issued-at together and refreshes the expiry
///   in one atomic step;
/// - `increase_errors` and `increase_sent_count` check existence and increment in one
///   atomic step, doing nothing when the record is absent or expired;
/// - reads of expired records behave as if the record was never written.
#[async_trait]
pub trait CodeStorage: Send + Sync {
    /// Store a code with zero errors and the current time as issued-at, replacing any previous one
    async fn set_code(
        &self,
        receiver: &str,
        business: &str,
        code: &str,
        ttl: Duration,
    ) -> Result<bool, StorageError>;

    /// Add one wrong attempt to the active code; no-op without an active code
    async fn increase_errors(&self, receiver: &str, business: &str) -> Result<(), StorageError>;

    /// The active code and its wrong attempts, `None` when absent or expired
    async fn get_effective_code(
        &self,
        receiver: &str,
        business: &str,
    ) -> Result<Option<EffectiveCode>, StorageError>;

    /// Open a quota window with a sent count of one; `None` never expires
    async fn set_quota_window(
        &self,
        receiver: &str,
        business: &str,
        window: Option<Duration>,
    ) -> Result<bool, StorageError>;

    /// Add one send to the open quota window; no-op without an open window
    async fn increase_sent_count(&self, receiver: &str, business: &str) -> Result<(), StorageError>;

    /// Sends in the open quota window, zero when absent or expired
    async fn get_sent_count(&self, receiver: &str, business: &str) -> Result<u32, StorageError>;

    /// When the active code was issued, `None` when absent or expired
    async fn get_last_issued_at(
        &self,
        receiver: &str,
        business: &str,
    ) -> Result<Option<DateTime<Utc>>, StorageError>;

    /// Remove both the code record and the quota record
    async fn clear_session(&self, receiver: &str, business: &str) -> Result<(), StorageError>;
}

/// Delivers codes to receivers
#[async_trait]
pub trait CodeSender: Send + Sync {
    /// Unique identity used to look the sender up, e.g. `sms`
    fn identity(&self) -> &str;

    /// Whether this sender can deliver to the receiver (e.g. an email sender rejects phone numbers)
    fn supports_receiver(&self, receiver: &str) -> bool;

    /// Deliver a code; `true` when the message was handed over successfully
    async fn send(&self, receiver: &str, business: &str, code: &str, ttl: Duration) -> bool;
}
