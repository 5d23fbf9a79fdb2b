//! Code senders and the default sender registry

pub mod console;


use std::sync::Arc;

use cc_core::errors::ConfigError;
use cc_core::services::{ContentFormatter, NoneSender, SenderRegistry};

use crate::email::{EmailCodeSender, MockEmailTransport};
use crate::sms::{MockSmsService, SmsCodeSender};

pub use console::ConsoleSender;

/// Registry with every sender this crate ships, backed by mock providers
///
/// Registers `none`, `console`, `sms` and `email`. Production deployments build
/// their own registry around real gateways.
pub fn create_development_registry(
    formatter: Arc<dyn ContentFormatter>,
) -> Result<SenderRegistry, ConfigError> {
    SenderRegistry::new()
        .with_sender(Arc::new(NoneSender::new()))?
        .with_sender(Arc::new(ConsoleSender::new(formatter.clone())))?
        .with_sender(Arc::new(SmsCodeSender::new(
            Arc::new(MockSmsService::new()),
            formatter.clone(),
        )))?
        .with_sender(Arc::new(EmailCodeSender::new(
            Arc::new(MockEmailTransport::new()),
            formatter,
        )))
}
