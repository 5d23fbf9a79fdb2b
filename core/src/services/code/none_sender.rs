//! Sender for flows that show the code themselves, e.g. captcha images

use async_trait::async_trait;
use std::time::Duration;

use super::traits::CodeSender;

/// Accepts every receiver and reports every delivery as successful
#[derive(Debug, Clone)]
pub struct NoneSender {
    identity: String,
}

impl NoneSender {
    pub const DEFAULT_IDENTITY: &'static str = "none";

    pub fn new() -> Self {
        Self::with_identity(Self::DEFAULT_IDENTITY)
    }

    pub fn with_identity(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

impl Default for NoneSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeSender for NoneSender {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn supports_receiver(&self, _receiver: &str) -> bool {
        true
    }

    async fn send(&self, _receiver: &str, _business: &str, _code: &str, _ttl: Duration) -> bool {
        true
    }
}
