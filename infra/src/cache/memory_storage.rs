//! Process-local code storage
//!
//! Records live in one mutex-guarded map pair. Expired records are treated as absent
//! on every access and dropped lazily. Writes also sweep every expired record once the
//! maps have doubled since the previous sweep or [`SWEEP_INTERVAL`] has passed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use cc_core::domain::{Clock, EffectiveCode, SystemClock};
use cc_core::errors::StorageError;
use cc_core::services::CodeStorage;

type SessionKey = (String, String);

/// Longest time between two sweeps triggered by writes
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Record count below which growth alone never triggers a sweep
const MIN_SWEEP_LEN: usize = 64;

#[derive(Debug, Clone)]
struct CodeEntry {
    code: String,
    errors: u32,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct QuotaEntry {
    count: u32,
    expires_at: Option<DateTime<Utc>>,
}

impl CodeEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

impl QuotaEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

struct Sessions {
    codes: HashMap<SessionKey, CodeEntry>,
    quotas: HashMap<SessionKey, QuotaEntry>,
    last_sweep: DateTime<Utc>,
    sweep_at_len: usize,
}

impl Sessions {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            codes: HashMap::new(),
            quotas: HashMap::new(),
            last_sweep: now,
            sweep_at_len: MIN_SWEEP_LEN,
        }
    }

    fn len(&self) -> usize {
        self.codes.len() + self.quotas.len()
    }

    fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.len();
        self.codes.retain(|_, entry| entry.is_live(now));
        self.quotas.retain(|_, entry| entry.is_live(now));
        self.last_sweep = now;
        self.sweep_at_len = (self.len() * 2).max(MIN_SWEEP_LEN);
        before - self.len()
    }

    /// Sweep when the maps doubled or the interval elapsed
    fn sweep_if_due(&mut self, now: DateTime<Utc>) {
        let interval_elapsed = (now - self.last_sweep)
            .to_std()
            .map_or(false, |elapsed| elapsed >= SWEEP_INTERVAL);
        if interval_elapsed || self.len() >= self.sweep_at_len {
            let removed = self.sweep(now);
            if removed > 0 {
                tracing::debug!(
                    removed = removed,
                    remaining = self.len(),
                    "Swept expired code records"
                );
            }
        }
    }

    fn live_code(&mut self, key: &SessionKey, now: DateTime<Utc>) -> Option<&mut CodeEntry> {
        if self.codes.get(key).is_some_and(|entry| !entry.is_live(now)) {
            self.codes.remove(key);
        }
        self.codes.get_mut(key)
    }

    fn live_quota(&mut self, key: &SessionKey, now: DateTime<Utc>) -> Option<&mut QuotaEntry> {
        if self.quotas.get(key).is_some_and(|entry| !entry.is_live(now)) {
            self.quotas.remove(key);
        }
        self.quotas.get_mut(key)
    }
}

/// In-memory [`CodeStorage`] for single-process deployments and tests
pub struct MemoryCodeStorage {
    sessions: Mutex<Sessions>,
    clock: Arc<dyn Clock>,
}

impl MemoryCodeStorage {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Use `clock` for expiry and issue times
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(Sessions::new(clock.now())),
            clock,
        }
    }

    /// Drop every expired record, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let removed = self.lock().sweep(self.clock.now());
        if removed > 0 {
            tracing::debug!(removed = removed, "Purged expired code records");
        }
        removed
    }

    /// Number of stored code and quota records, expired ones included
    pub fn record_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn expiry(now: DateTime<Utc>, after: Duration) -> DateTime<Utc> {
        chrono::Duration::from_std(after)
            .ok()
            .and_then(|after| now.checked_add_signed(after))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for MemoryCodeStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn session_key(receiver: &str, business: &str) -> SessionKey {
    (receiver.to_string(), business.to_string())
}

#[async_trait]
impl CodeStorage for MemoryCodeStorage {
    async fn set_code(
        &self,
        receiver: &str,
        business: &str,
        code: &str,
        ttl: Duration,
    ) -> Result<bool, StorageError> {
        let now = self.clock.now();
        let entry = CodeEntry {
            code: code.to_string(),
            errors: 0,
            issued_at: now,
            expires_at: Self::expiry(now, ttl),
        };
        let mut sessions = self.lock();
        sessions.sweep_if_due(now);
        sessions.codes.insert(session_key(receiver, business), entry);
        Ok(true)
    }

    async fn increase_errors(&self, receiver: &str, business: &str) -> Result<(), StorageError> {
        let now = self.clock.now();
        let mut sessions = self.lock();
        if let Some(entry) = sessions.live_code(&session_key(receiver, business), now) {
            entry.errors = entry.errors.saturating_add(1);
        }
        Ok(())
    }

    async fn get_effective_code(
        &self,
        receiver: &str,
        business: &str,
    ) -> Result<Option<EffectiveCode>, StorageError> {
        let now = self.clock.now();
        let mut sessions = self.lock();
        Ok(sessions
            .live_code(&session_key(receiver, business), now)
            .map(|entry| EffectiveCode {
                code: entry.code.clone(),
                error_count: entry.errors,
            }))
    }

    async fn set_quota_window(
        &self,
        receiver: &str,
        business: &str,
        window: Option<Duration>,
    ) -> Result<bool, StorageError> {
        let now = self.clock.now();
        let entry = QuotaEntry {
            count: 1,
            expires_at: window.map(|window| Self::expiry(now, window)),
        };
        let mut sessions = self.lock();
        sessions.sweep_if_due(now);
        sessions.quotas.insert(session_key(receiver, business), entry);
        Ok(true)
    }

    async fn increase_sent_count(&self, receiver: &str, business: &str) -> Result<(), StorageError> {
        let now = self.clock.now();
        let mut sessions = self.lock();
        if let Some(entry) = sessions.live_quota(&session_key(receiver, business), now) {
            entry.count = entry.count.saturating_add(1);
        }
        Ok(())
    }

    async fn get_sent_count(&self, receiver: &str, business: &str) -> Result<u32, StorageError> {
        let now = self.clock.now();
        let mut sessions = self.lock();
        Ok(sessions
            .live_quota(&session_key(receiver, business), now)
            .map_or(0, |entry| entry.count))
    }

    async fn get_last_issued_at(
        &self,
        receiver: &str,
        business: &str,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let now = self.clock.now();
        let mut sessions = self.lock();
        Ok(sessions
            .live_code(&session_key(receiver, business), now)
            .map(|entry| entry.issued_at))
    }

    async fn clear_session(&self, receiver: &str, business: &str) -> Result<(), StorageError> {
        let key = session_key(receiver, business);
        let mut sessions = self.lock();
        sessions.codes.remove(&key);
        sessions.quotas.remove(&key);
        Ok(())
    }
}
