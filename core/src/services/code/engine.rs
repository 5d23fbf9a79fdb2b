//! Code engine: one send/verify cycle against one storage and one sender

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use std::time::Duration;

use cc_shared::utils::mask_receiver;

use crate::domain::{Clock, PeriodLimit, SendOutcome, SystemClock, VerifyOutcome};
use crate::errors::DomainResult;

use super::traits::{CodeSender, CodeStorage};

/// Issues and verifies codes for `(receiver, business)` sessions
///
/// The engine holds no state of its own; every record lives in the storage.
#[derive(Clone)]
pub struct CodeEngine {
    sender: Arc<dyn CodeSender>,
    storage: Arc<dyn CodeStorage>,
    clock: Arc<dyn Clock>,
}

impl CodeEngine {
    /// Create an engine reading time from the system clock
    pub fn new(sender: Arc<dyn CodeSender>, storage: Arc<dyn CodeStorage>) -> Self {
        Self::with_clock(sender, storage, Arc::new(SystemClock))
    }

    /// Create an engine with an injected time source
    pub fn with_clock(
        sender: Arc<dyn CodeSender>,
        storage: Arc<dyn CodeStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sender,
            storage,
            clock,
        }
    }

    pub fn sender(&self) -> &Arc<dyn CodeSender> {
        &self.sender
    }

    pub fn storage(&self) -> &Arc<dyn CodeStorage> {
        &self.storage
    }

    /// Deliver `code` to `receiver` and persist it for `ttl`
    ///
    /// Checks run in order: receiver support, send quota, cooldown. Delivery happens
    /// before anything is written, so a failed delivery consumes neither quota nor
    /// cooldown. Storage errors are reported as [`SendOutcome::FailInSend`].
    pub async fn issue_code(
        &self,
        receiver: &str,
        business: &str,
        code: &str,
        ttl: Duration,
        limit: Option<&PeriodLimit>,
    ) -> SendOutcome {
        let masked = mask_receiver(receiver);
        let sender = self.sender.identity();

        if !self.sender.supports_receiver(receiver) {
            tracing::debug!(
                receiver = %masked,
                business = business,
                sender = sender,
                event = "receiver_not_supported",
                "Sender cannot deliver to receiver"
            );
            return SendOutcome::NotSupported;
        }

        let mut sent_so_far = 0;
        if let Some(limit) = limit.filter(|l| l.is_count_limited()) {
            sent_so_far = match self.storage.get_sent_count(receiver, business).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::error!(
                        receiver = %masked,
                        business = business,
                        error = %e,
                        event = "quota_read_failed",
                        "Failed to read send count"
                    );
                    return SendOutcome::FailInSend;
                }
            };
            if sent_so_far >= limit.max_count {
                tracing::warn!(
                    receiver = %masked,
                    business = business,
                    sent_count = sent_so_far,
                    max_count = limit.max_count,
                    event = "send_limit_exceeded",
                    "Send quota exhausted"
                );
                return SendOutcome::MaxSendLimit;
            }
        }

        if let Some(min_interval) = limit.and_then(|l| l.min_interval) {
            let remaining = match self.cooldown_remaining(receiver, business, min_interval).await {
                Ok(remaining) => remaining,
                Err(e) => {
                    tracing::error!(
                        receiver = %masked,
                        business = business,
                        error = %e,
                        event = "cooldown_read_failed",
                        "Failed to read last issue time"
                    );
                    return SendOutcome::FailInSend;
                }
            };
            if !remaining.is_zero() {
                tracing::warn!(
                    receiver = %masked,
                    business = business,
                    cooldown_remaining = remaining.as_secs(),
                    event = "send_interval_limited",
                    "Code requested again before cooldown elapsed"
                );
                return SendOutcome::IntervalLimit;
            }
        }

        if !self.sender.send(receiver, business, code, ttl).await {
            tracing::warn!(
                receiver = %masked,
                business = business,
                sender = sender,
                event = "code_delivery_failed",
                "Sender failed to deliver code"
            );
            return SendOutcome::FailInSend;
        }

        match self.storage.set_code(receiver, business, code, ttl).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::error!(
                    receiver = %masked,
                    business = business,
                    event = "code_storage_failed",
                    "Storage rejected verification code"
                );
                return SendOutcome::FailInSend;
            }
            Err(e) => {
                tracing::error!(
                    receiver = %masked,
                    business = business,
                    error = %e,
                    event = "code_storage_failed",
                    "Failed to store verification code"
                );
                return SendOutcome::FailInSend;
            }
        }

        if let Some(limit) = limit.filter(|l| l.is_count_limited()) {
            let updated = if sent_so_far == 0 {
                self.storage
                    .set_quota_window(receiver, business, limit.window)
                    .await
                    .map(|_| ())
            } else {
                self.storage.increase_sent_count(receiver, business).await
            };
            if let Err(e) = updated {
                tracing::warn!(
                    receiver = %masked,
                    business = business,
                    error = %e,
                    event = "quota_update_failed",
                    "Code issued but send count was not updated"
                );
            }
        }

        tracing::info!(
            receiver = %masked,
            business = business,
            sender = sender,
            event = "code_issued",
            "Issued verification code"
        );
        SendOutcome::Success
    }

    /// Check `supplied` against the active code
    ///
    /// Comparison ignores case. Once `max_errors` wrong attempts are recorded
    /// the session stays locked until the code expires or a new one is issued.
    pub async fn verify_code(
        &self,
        receiver: &str,
        business: &str,
        supplied: &str,
        max_errors: u32,
        reset_on_success: bool,
    ) -> DomainResult<VerifyOutcome> {
        let masked = mask_receiver(receiver);

        let active = match self.storage.get_effective_code(receiver, business).await? {
            Some(active) if !active.code.trim().is_empty() => active,
            _ => {
                tracing::debug!(
                    receiver = %masked,
                    business = business,
                    event = "code_expired",
                    "No active verification code"
                );
                return Ok(VerifyOutcome::Expired);
            }
        };

        if active.error_count >= max_errors {
            tracing::warn!(
                receiver = %masked,
                business = business,
                error_count = active.error_count,
                event = "max_errors_exceeded",
                "Verification locked after too many wrong attempts"
            );
            return Ok(VerifyOutcome::MaxErrorLimit);
        }

        if codes_match(&active.code, supplied) {
            if reset_on_success {
                if let Err(e) = self.storage.clear_session(receiver, business).await {
                    tracing::warn!(
                        receiver = %masked,
                        business = business,
                        error = %e,
                        event = "session_clear_failed",
                        "Verified code but failed to clear session"
                    );
                }
            }
            tracing::info!(
                receiver = %masked,
                business = business,
                event = "code_verified",
                "Verification code accepted"
            );
            return Ok(VerifyOutcome::Success);
        }

        self.storage.increase_errors(receiver, business).await?;
        tracing::warn!(
            receiver = %masked,
            business = business,
            error_count = active.error_count + 1,
            max_errors = max_errors,
            event = "code_verification_failed",
            "Wrong verification code supplied"
        );
        Ok(VerifyOutcome::Failed)
    }

    /// Time left before another code may be sent, zero when none
    pub async fn send_cooldown_remaining(
        &self,
        receiver: &str,
        business: &str,
        limit: Option<&PeriodLimit>,
    ) -> DomainResult<Duration> {
        match limit.and_then(|l| l.min_interval) {
            Some(min_interval) => Ok(self
                .cooldown_remaining(receiver, business, min_interval)
                .await?),
            None => Ok(Duration::ZERO),
        }
    }

    /// When the active code was issued
    pub async fn last_issued_at(
        &self,
        receiver: &str,
        business: &str,
    ) -> DomainResult<Option<DateTime<Utc>>> {
        Ok(self.storage.get_last_issued_at(receiver, business).await?)
    }

    async fn cooldown_remaining(
        &self,
        receiver: &str,
        business: &str,
        min_interval: Duration,
    ) -> Result<Duration, crate::errors::StorageError> {
        let Some(issued_at) = self.storage.get_last_issued_at(receiver, business).await? else {
            return Ok(Duration::ZERO);
        };
        let elapsed = (self.clock.now() - issued_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        Ok(min_interval.saturating_sub(elapsed))
    }
}

fn codes_match(stored: &str, supplied: &str) -> bool {
    let stored = stored.to_lowercase();
    let supplied = supplied.to_lowercase();
    constant_time_eq(stored.as_bytes(), supplied.as_bytes())
}
