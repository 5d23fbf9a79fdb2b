//! Sender lookup by identity

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ConfigError;
use crate::services::code::CodeSender;

/// Senders available to a resolver, keyed by their identity
///
/// Populated once at startup; lookups of unregistered identities fail instead of
/// falling back to another sender.
#[derive(Clone, Default)]
pub struct SenderRegistry {
    senders: HashMap<String, Arc<dyn CodeSender>>,
}

impl SenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sender under its own identity
    pub fn register(&mut self, sender: Arc<dyn CodeSender>) -> Result<(), ConfigError> {
        let identity = sender.identity().to_string();
        if self.senders.contains_key(&identity) {
            return Err(ConfigError::DuplicateSender { identity });
        }
        tracing::debug!(sender = %identity, "Registered code sender");
        self.senders.insert(identity, sender);
        Ok(())
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_sender(mut self, sender: Arc<dyn CodeSender>) -> Result<Self, ConfigError> {
        self.register(sender)?;
        Ok(self)
    }

    pub fn resolve(&self, identity: &str) -> Result<Arc<dyn CodeSender>, ConfigError> {
        self.senders
            .get(identity)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownSender {
                identity: identity.to_string(),
            })
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.senders.contains_key(identity)
    }

    /// Registered identities in sorted order
    pub fn identities(&self) -> Vec<&str> {
        let mut identities: Vec<&str> = self.senders.keys().map(String::as_str).collect();
        identities.sort_unstable();
        identities
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
