//! The `sms` code sender

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use cc_core::services::{CodeSender, ContentFormatter};
use cc_shared::utils::{is_valid_phone, mask_phone_number, normalize_phone_number};

use super::sms_service::SmsService;

/// Renders the code through a formatter and hands it to an [`SmsService`]
pub struct SmsCodeSender {
    identity: String,
    service: Arc<dyn SmsService>,
    formatter: Arc<dyn ContentFormatter>,
}

impl SmsCodeSender {
    pub const DEFAULT_IDENTITY: &'static str = "sms";

    pub fn new(service: Arc<dyn SmsService>, formatter: Arc<dyn ContentFormatter>) -> Self {
        Self::with_identity(Self::DEFAULT_IDENTITY, service, formatter)
    }

    pub fn with_identity(
        identity: impl Into<String>,
        service: Arc<dyn SmsService>,
        formatter: Arc<dyn ContentFormatter>,
    ) -> Self {
        Self {
            identity: identity.into(),
            service,
            formatter,
        }
    }
}

#[async_trait]
impl CodeSender for SmsCodeSender {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn supports_receiver(&self, receiver: &str) -> bool {
        is_valid_phone(receiver)
    }

    async fn send(&self, receiver: &str, business: &str, code: &str, ttl: Duration) -> bool {
        let masked = mask_phone_number(receiver);
        let content = match self
            .formatter
            .render(receiver, business, code, ttl, Some(&self.identity))
        {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(
                    receiver = %masked,
                    business = business,
                    error = %e,
                    event = "content_render_failed",
                    "Failed to render SMS content"
                );
                return false;
            }
        };

        match self
            .service
            .send_sms(&normalize_phone_number(receiver), &content)
            .await
        {
            Ok(message_id) => {
                tracing::info!(
                    receiver = %masked,
                    business = business,
                    provider = self.service.provider_name(),
                    message_id = %message_id,
                    event = "sms_sent",
                    "Verification code sent via SMS"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    receiver = %masked,
                    business = business,
                    provider = self.service.provider_name(),
                    error = %e,
                    event = "sms_failed",
                    "Failed to send verification code via SMS"
                );
                false
            }
        }
    }
}
