//! Mock SMS Service Implementation
//!
//! Logs SMS messages to the console instead of sending them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use cc_shared::utils::{is_valid_phone, mask_phone_number};

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// A message accepted by [`MockSmsService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub message_id: String,
    pub phone_number: String,
    pub content: String,
}

/// Mock SMS service for development and testing
///
/// Validates phone numbers, generates mock message ids and keeps every accepted
/// message for inspection.
#[derive(Clone)]
pub struct MockSmsService {
    message_count: Arc<AtomicU64>,
    sent: Arc<Mutex<Vec<SentSms>>>,
    simulate_failure: Arc<AtomicBool>,
    console_output: bool,
}

impl MockSmsService {
    /// Create a new mock SMS service printing to the console
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Messages accepted so far, oldest first
    pub fn sent_messages(&self) -> Vec<SentSms> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let masked_phone = mask_phone_number(phone_number);

        if !is_valid_phone(phone_number) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid phone number format: {}",
                masked_phone
            )));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!("Mock SMS service simulating failure for phone: {}", masked_phone);
            return Err(InfrastructureError::Sms(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("📱 MOCK SMS SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", phone_number);
            println!("Message ID: {}", message_id);
            println!("Content: {}", message);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "sms_service",
            provider = "mock",
            phone = %masked_phone,
            message_id = %message_id,
            message_length = message.len(),
            "SMS sent successfully (mock)"
        );

        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SentSms {
                message_id: message_id.clone(),
                phone_number: phone_number.to_string(),
                content: message.to_string(),
            });

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure.load(Ordering::SeqCst)
    }
}
