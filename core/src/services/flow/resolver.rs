//! Per-flow parameter resolution on top of the code engine

use std::sync::Arc;
use std::time::Duration;

use cc_shared::config::{FlowPolicy, FlowSettings};

use crate::domain::{Clock, FlowKey, PeriodLimit, SendOutcome, SystemClock, VerifyOutcome};
use crate::errors::{ConfigError, DomainResult};
use crate::services::code::{CodeEngine, CodeSender, CodeStorage};

use super::registry::SenderRegistry;

/// Runs the code engine with parameters looked up per `(sender, business)` flow
///
/// Every call resolves its parameters first; a missing code lifetime, error limit or
/// sender aborts the call with a [`ConfigError`] before anything is sent or stored.
pub struct FlowResolver {
    settings: FlowSettings,
    registry: SenderRegistry,
    storage: Arc<dyn CodeStorage>,
    clock: Arc<dyn Clock>,
}

impl FlowResolver {
    /// Create a resolver reading time from the system clock
    pub fn new(
        settings: FlowSettings,
        registry: SenderRegistry,
        storage: Arc<dyn CodeStorage>,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(settings, registry, storage, Arc::new(SystemClock))
    }

    /// Create a resolver with an injected time source
    ///
    /// Every configured flow key must parse. Suspicious but usable settings are
    /// logged as warnings.
    pub fn with_clock(
        settings: FlowSettings,
        registry: SenderRegistry,
        storage: Arc<dyn CodeStorage>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        for (key, policy) in &settings.flows {
            let flow = FlowKey::parse(key)?;
            check_policy(&flow, policy, &registry);
        }

        tracing::info!(
            flows = settings.flows.len(),
            senders = ?registry.identities(),
            isolate_senders = settings.isolate_senders,
            "Flow resolver initialized"
        );

        Ok(Self {
            settings,
            registry,
            storage,
            clock,
        })
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    pub fn registry(&self) -> &SenderRegistry {
        &self.registry
    }

    /// Quota and cooldown of a flow, `None` when neither is configured
    pub fn resolve_quota(&self, sender: &str, business: &str) -> Option<PeriodLimit> {
        self.policy(sender, business)
            .and_then(PeriodLimit::from_policy)
    }

    pub fn resolve_code_ttl(&self, sender: &str, business: &str) -> Result<Duration, ConfigError> {
        self.policy(sender, business)
            .and_then(FlowPolicy::code_ttl)
            .ok_or_else(|| ConfigError::MissingCodeTtl {
                key: FlowKey::join(sender, business),
            })
    }

    pub fn resolve_error_limit(&self, sender: &str, business: &str) -> Result<u32, ConfigError> {
        self.policy(sender, business)
            .and_then(|p| p.max_errors)
            .ok_or_else(|| ConfigError::MissingErrorLimit {
                key: FlowKey::join(sender, business),
            })
    }

    pub fn resolve_sender(&self, identity: &str) -> Result<Arc<dyn CodeSender>, ConfigError> {
        self.registry.resolve(identity)
    }

    /// Engine bound to one sender and the shared storage
    pub fn engine(&self, sender: &str) -> Result<CodeEngine, ConfigError> {
        Ok(CodeEngine::with_clock(
            self.resolve_sender(sender)?,
            self.storage.clone(),
            self.clock.clone(),
        ))
    }

    /// Business flag under which sessions of this flow are stored
    pub fn session_business(&self, sender: &str, business: &str) -> String {
        if self.settings.isolate_senders {
            FlowKey::join(sender, business)
        } else {
            business.to_string()
        }
    }

    pub async fn send_code(
        &self,
        sender: &str,
        receiver: &str,
        business: &str,
        code: &str,
    ) -> DomainResult<SendOutcome> {
        let engine = self.engine(sender)?;
        let limit = self.resolve_quota(sender, business);
        let ttl = self.resolve_code_ttl(sender, business)?;
        let session = self.session_business(sender, business);

        Ok(engine
            .issue_code(receiver, &session, code, ttl, limit.as_ref())
            .await)
    }

    pub async fn verify_code(
        &self,
        sender: &str,
        receiver: &str,
        business: &str,
        code: &str,
        reset_on_success: bool,
    ) -> DomainResult<VerifyOutcome> {
        let engine = self.engine(sender)?;
        let max_errors = self.resolve_error_limit(sender, business)?;
        let session = self.session_business(sender, business);

        engine
            .verify_code(receiver, &session, code, max_errors, reset_on_success)
            .await
    }

    pub async fn send_cooldown_remaining(
        &self,
        sender: &str,
        receiver: &str,
        business: &str,
    ) -> DomainResult<Duration> {
        let engine = self.engine(sender)?;
        let limit = self.resolve_quota(sender, business);
        let session = self.session_business(sender, business);

        engine
            .send_cooldown_remaining(receiver, &session, limit.as_ref())
            .await
    }

    fn policy(&self, sender: &str, business: &str) -> Option<&FlowPolicy> {
        self.settings.policy(&FlowKey::join(sender, business))
    }
}

fn check_policy(flow: &FlowKey, policy: &FlowPolicy, registry: &SenderRegistry) {
    if !registry.contains(flow.sender()) {
        tracing::warn!(
            flow = %flow,
            sender = flow.sender(),
            "Flow configured for an unregistered sender"
        );
    }
    if policy.window_seconds.is_some() && policy.max_sends.is_none() {
        tracing::warn!(
            flow = %flow,
            "Quota window configured without max_sends, ignoring it"
        );
    }
    if let (Some(interval), Some(ttl)) = (policy.interval(), policy.code_ttl()) {
        if interval > ttl {
            tracing::warn!(
                flow = %flow,
                interval_seconds = interval.as_secs(),
                code_ttl_seconds = ttl.as_secs(),
                "Send interval exceeds code lifetime, cooldown ends when the code expires"
            );
        }
    }
}
