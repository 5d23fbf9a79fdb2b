//! Mock email transport for development and testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use cc_shared::utils::{is_valid_email, mask_email};

use super::transport::EmailTransport;
use crate::InfrastructureError;

/// An email accepted by [`MockEmailTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub message_id: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Keeps emails in memory and optionally prints them
#[derive(Clone)]
pub struct MockEmailTransport {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    simulate_failure: Arc<AtomicBool>,
    console_output: bool,
}

impl MockEmailTransport {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
        }
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

impl Default for MockEmailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailTransport for MockEmailTransport {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        let masked = mask_email(to);

        if !is_valid_email(to) {
            return Err(InfrastructureError::Email(format!(
                "Invalid email address: {}",
                masked
            )));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!("Mock email transport simulating failure for: {}", masked);
            return Err(InfrastructureError::Email(
                "Simulated email sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("✉️  MOCK EMAIL TRANSPORT");
            println!("{}", "=".repeat(60));
            println!("To: {}", to);
            println!("Subject: {}", subject);
            println!("Message ID: {}", message_id);
            println!("{}", body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "email_service",
            provider = "mock",
            to = %masked,
            message_id = %message_id,
            "Email sent successfully (mock)"
        );

        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SentEmail {
                message_id: message_id.clone(),
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
