//! Email transport interface

use async_trait::async_trait;

use crate::InfrastructureError;

/// Hands finished messages to a mail provider
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Send a plain-text email, returning the provider's message id
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError>;

    /// Get the transport provider name
    fn provider_name(&self) -> &str;
}
