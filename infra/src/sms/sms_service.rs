//! SMS Service Interface

use async_trait::async_trait;

use crate::InfrastructureError;

/// SMS service trait for sending text messages
///
/// Implemented by SMS gateways and by [`MockSmsService`](super::MockSmsService) for development.
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send an SMS message to a phone number
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Unique identifier for the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError>;

    /// Get the service provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is available
    ///
    /// Default implementation always returns true.
    async fn is_available(&self) -> bool {
        true
    }
}
