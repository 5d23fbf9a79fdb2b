//! The `console` code sender

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cc_core::services::{CodeSender, ContentFormatter};
use cc_shared::utils::mask_receiver;

/// Prints rendered messages instead of delivering them
///
/// Accepts any non-blank receiver. Useful in development when no gateway is configured.
pub struct ConsoleSender {
    identity: String,
    formatter: Arc<dyn ContentFormatter>,
    console_output: bool,
    message_count: AtomicU64,
}

impl ConsoleSender {
    pub const DEFAULT_IDENTITY: &'static str = "console";

    pub fn new(formatter: Arc<dyn ContentFormatter>) -> Self {
        Self {
            identity: Self::DEFAULT_IDENTITY.to_string(),
            formatter,
            console_output: true,
            message_count: AtomicU64::new(0),
        }
    }

    /// Log only, without printing to stdout
    pub fn quiet(mut self) -> Self {
        self.console_output = false;
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeSender for ConsoleSender {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn supports_receiver(&self, receiver: &str) -> bool {
        !receiver.trim().is_empty()
    }

    async fn send(&self, receiver: &str, business: &str, code: &str, ttl: Duration) -> bool {
        let masked = mask_receiver(receiver);
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
                    "Failed to render console content"
                );
                return false;
            }
        };

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("💬 CONSOLE SENDER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", receiver);
            println!("Business: {}", business);
            println!("Content: {}", content);
            println!("{}\n", "=".repeat(60));
        }

        tracing::info!(
            receiver = %masked,
            business = business,
            sender = %self.identity,
            event = "console_sent",
            "Verification code written to console"
        );
        true
    }
}
