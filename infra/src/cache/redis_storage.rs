//! Redis code storage
//!
//! Each session owns two hashes:
//! - `{prefix}:code:{len}:{business}:{receiver}` with `code`, `errors` and `issued_at`
//!   (unix milliseconds), expiring with the code;
//! - `{prefix}:quota:{len}:{business}:{receiver}` with `count`, expiring with the
//!   quota window or never.
//!
//! `len` is the byte length of the business flag, so no two sessions share a key.
//! Writes and increments run as Lua scripts to stay atomic.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use redis::Script;
use std::sync::Arc;
use std::time::Duration;

use cc_core::domain::{Clock, EffectiveCode, SystemClock};
use cc_core::errors::StorageError;
use cc_core::services::CodeStorage;
use cc_shared::utils::mask_receiver;

use super::redis_client::RedisClient;

const CODE_FIELD: &str = "code";
const ERRORS_FIELD: &str = "errors";
const ISSUED_AT_FIELD: &str = "issued_at";
const COUNT_FIELD: &str = "count";

/// Replace the code hash and restart its expiry
static SET_CODE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
redis.call('DEL', KEYS[1])
redis.call('HSET', KEYS[1], 'code', ARGV[1], 'errors', 0, 'issued_at', ARGV[2])
redis.call('PEXPIRE', KEYS[1], ARGV[3])
return 1
",
    )
});

/// Open a quota window with a count of one; a negative window never expires
static SET_QUOTA_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
redis.call('DEL', KEYS[1])
redis.call('HSET', KEYS[1], 'count', 1)
if tonumber(ARGV[1]) >= 0 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
return 1
",
    )
});

/// Increment a hash field only while the hash exists
static INCREMENT_IF_EXISTS_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return redis.call('HINCRBY', KEYS[1], ARGV[1], 1)
end
return 0
",
    )
});

/// [`CodeStorage`] backed by Redis hashes
pub struct RedisCodeStorage {
    client: RedisClient,
    clock: Arc<dyn Clock>,
}

impl RedisCodeStorage {
    pub fn new(client: RedisClient) -> Self {
        Self::with_clock(client, Arc::new(SystemClock))
    }

    /// Use `clock` for issue times; expiry is always enforced by Redis
    pub fn with_clock(client: RedisClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    pub(crate) fn code_key(&self, receiver: &str, business: &str) -> String {
        self.client.make_key(&session_suffix("code", receiver, business))
    }

    pub(crate) fn quota_key(&self, receiver: &str, business: &str) -> String {
        self.client.make_key(&session_suffix("quota", receiver, business))
    }
}

pub(crate) fn session_suffix(kind: &str, receiver: &str, business: &str) -> String {
    format!("{}:{}:{}:{}", kind, business.len(), business, receiver)
}

pub(crate) fn millis(duration: Duration) -> String {
    u64::try_from(duration.as_millis())
        .unwrap_or(u64::MAX)
        .to_string()
}

#[async_trait]
impl CodeStorage for RedisCodeStorage {
    async fn set_code(
        &self,
        receiver: &str,
        business: &str,
        code: &str,
        ttl: Duration,
    ) -> Result<bool, StorageError> {
        let key = self.code_key(receiver, business);
        let issued_at = self.clock.now().timestamp_millis().to_string();

        let stored: i64 = self
            .client
            .eval_with_retry(
                &SET_CODE_SCRIPT,
                vec![key],
                vec![code.to_string(), issued_at, millis(ttl)],
            )
            .await?;

        tracing::debug!(
            receiver = %mask_receiver(receiver),
            business = business,
            ttl_ms = %millis(ttl),
            "Stored verification code in Redis"
        );
        Ok(stored == 1)
    }

    async fn increase_errors(&self, receiver: &str, business: &str) -> Result<(), StorageError> {
        let errors: i64 = self
            .client
            .eval_once(
                &INCREMENT_IF_EXISTS_SCRIPT,
                vec![self.code_key(receiver, business)],
                vec![ERRORS_FIELD.to_string()],
            )
            .await?;

        tracing::debug!(
            receiver = %mask_receiver(receiver),
            business = business,
            errors = errors,
            "Incremented verification error count"
        );
        Ok(())
    }

    async fn get_effective_code(
        &self,
        receiver: &str,
        business: &str,
    ) -> Result<Option<EffectiveCode>, StorageError> {
        let key = self.code_key(receiver, business);
        let mut cmd = redis::cmd("HMGET");
        cmd.arg(&key).arg(CODE_FIELD).arg(ERRORS_FIELD);

        let (code, errors): (Option<String>, Option<u32>) = self.client.query(cmd).await?;
        Ok(code.map(|code| EffectiveCode {
            code,
            error_count: errors.unwrap_or(0),
        }))
    }

    async fn set_quota_window(
        &self,
        receiver: &str,
        business: &str,
        window: Option<Duration>,
    ) -> Result<bool, StorageError> {
        let window_ms = window.map_or_else(|| "-1".to_string(), millis);

        let stored: i64 = self
            .client
            .eval_with_retry(
                &SET_QUOTA_SCRIPT,
                vec![self.quota_key(receiver, business)],
                vec![window_ms],
            )
            .await?;
        Ok(stored == 1)
    }

    async fn increase_sent_count(&self, receiver: &str, business: &str) -> Result<(), StorageError> {
        let count: i64 = self
            .client
            .eval_once(
                &INCREMENT_IF_EXISTS_SCRIPT,
                vec![self.quota_key(receiver, business)],
                vec![COUNT_FIELD.to_string()],
            )
            .await?;

        tracing::debug!(
            receiver = %mask_receiver(receiver),
            business = business,
            count = count,
            "Incremented send count"
        );
        Ok(())
    }

    async fn get_sent_count(&self, receiver: &str, business: &str) -> Result<u32, StorageError> {
        let mut cmd = redis::cmd("HGET");
        cmd.arg(self.quota_key(receiver, business)).arg(COUNT_FIELD);

        let count: Option<u32> = self.client.query(cmd).await?;
        Ok(count.unwrap_or(0))
    }

    async fn get_last_issued_at(
        &self,
        receiver: &str,
        business: &str,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let key = self.code_key(receiver, business);
        let mut cmd = redis::cmd("HGET");
        cmd.arg(&key).arg(ISSUED_AT_FIELD);

        let issued_at: Option<i64> = self.client.query(cmd).await?;
        match issued_at {
            None => Ok(None),
            Some(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .map(Some)
                .ok_or_else(|| StorageError::Corrupted {
                    key,
                    message: format!("invalid issue time {}", ms),
                }),
        }
    }

    async fn clear_session(&self, receiver: &str, business: &str) -> Result<(), StorageError> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(self.code_key(receiver, business))
            .arg(self.quota_key(receiver, business));

        let removed: u32 = self.client.query(cmd).await?;
        tracing::debug!(
            receiver = %mask_receiver(receiver),
            business = business,
            removed = removed,
            "Cleared verification session"
        );
        Ok(())
    }
}
