//! The `email` code sender

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use cc_core::services::{CodeSender, ContentFormatter};
use cc_shared::utils::{is_valid_email, mask_email};

use super::transport::EmailTransport;

const DEFAULT_SUBJECT: &str = "Your verification code";

/// Renders the code through a formatter and mails it
pub struct EmailCodeSender {
    identity: String,
    subject: String,
    transport: Arc<dyn EmailTransport>,
    formatter: Arc<dyn ContentFormatter>,
}

impl EmailCodeSender {
    pub const DEFAULT_IDENTITY: &'static str = "email";

    pub fn new(transport: Arc<dyn EmailTransport>, formatter: Arc<dyn ContentFormatter>) -> Self {
        Self {
            identity: Self::DEFAULT_IDENTITY.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            transport,
            formatter,
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// Subject line, `{business}` is replaced with the business flag
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }
}

#[async_trait]
impl CodeSender for EmailCodeSender {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn supports_receiver(&self, receiver: &str) -> bool {
        is_valid_email(receiver)
    }

    async fn send(&self, receiver: &str, business: &str, code: &str, ttl: Duration) -> bool {
        let masked = mask_email(receiver);
        let body = match self
            .formatter
            .render(receiver, business, code, ttl, Some(&self.identity))
        {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(
                    receiver = %masked,
                    business = business,
                    error = %e,
                    event = "content_render_failed",
                    "Failed to render email content"
                );
                return false;
            }
        };
        let subject = self.subject.replace("{business}", business);

        match self
            .transport
            .send_email(receiver.trim(), &subject, &body)
            .await
        {
            Ok(message_id) => {
                tracing::info!(
                    receiver = %masked,
                    business = business,
                    provider = self.transport.provider_name(),
                    message_id = %message_id,
                    event = "email_sent",
                    "Verification code sent via email"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    receiver = %masked,
                    business = business,
                    provider = self.transport.provider_name(),
                    error = %e,
                    event = "email_failed",
                    "Failed to send verification code via email"
                );
                false
            }
        }
    }
}
