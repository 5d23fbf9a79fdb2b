//! SMS Service Module
//!
//! Delivers codes as text messages.
//!
//! ## Features
//!
//! - **SMS Service Trait**: Common interface for SMS providers
//! - **Mock Implementation**: Console output for development
//! - **SMS Code Sender**: The `sms` sender, accepting mainland mobile and E.164 numbers
//! - **Security**: Phone number masking in logs

pub mod mock_sms;
pub mod sms_sender;
pub mod sms_service;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use mock_sms::MockSmsService;
pub use sms_sender::SmsCodeSender;
pub use sms_service::SmsService;
