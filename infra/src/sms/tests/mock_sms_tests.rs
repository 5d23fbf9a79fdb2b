//! Unit tests for mock SMS service

use crate::sms::{MockSmsService, SmsService};
use crate::InfrastructureError;

#[tokio::test]
async fn test_mock_sms_send_success() {
    let service = MockSmsService::with_options(false, false);
    let result = service.send_sms("+1234567890", "Test message").await;

    let message_id = result.unwrap();
    assert!(message_id.starts_with("mock_"));
    assert_eq!(service.get_message_count(), 1);

    let sent = service.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message_id, message_id);
    assert_eq!(sent[0].content, "Test message");
}

#[tokio::test]
async fn test_mock_sms_accepts_mainland_mobile() {
    let service = MockSmsService::with_options(false, false);
    assert!(service.send_sms("13800138000", "Test message").await.is_ok());
}

#[tokio::test]
async fn test_mock_sms_invalid_phone() {
    let service = MockSmsService::with_options(false, false);
    let result = service.send_sms("12345", "Test message").await;

    if let Err(InfrastructureError::Sms(msg)) = result {
        assert!(msg.contains("Invalid phone number"));
    } else {
        panic!("Expected Sms error");
    }
    assert_eq!(service.get_message_count(), 0);
}

#[tokio::test]
async fn test_mock_sms_simulate_failure() {
    let service = MockSmsService::with_options(false, false);
    service.set_simulate_failure(true);

    let result = service.send_sms("+1234567890", "Test message").await;
    assert!(result.is_err());
    assert!(!service.is_available().await);

    service.set_simulate_failure(false);
    assert!(service.is_available().await);
}
