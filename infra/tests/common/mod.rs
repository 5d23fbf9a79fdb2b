//! Storage contract checks shared by every backend
//!
//! Each check uses receivers unique to the run so backends that outlive the test
//! process (Redis) start from a clean session. Expiry checks use short real
//! durations.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use cc_core::domain::EffectiveCode;
use cc_core::services::CodeStorage;

pub const BUSINESS: &str = "login";

/// A receiver no previous run has used
pub fn unique_receiver(label: &str) -> String {
    format!("{}-{}@example.com", label, Uuid::new_v4().simple())
}

pub async fn check_set_and_get_code(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("set");
    assert!(storage
        .set_code(&receiver, BUSINESS, "123456", Duration::from_secs(60))
        .await
        .unwrap());

    assert_eq!(
        storage.get_effective_code(&receiver, BUSINESS).await.unwrap(),
        Some(EffectiveCode {
            code: "123456".to_string(),
            error_count: 0
        })
    );
}

pub async fn check_absent_session(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("absent");
    assert_eq!(storage.get_effective_code(&receiver, BUSINESS).await.unwrap(), None);
    assert_eq!(storage.get_sent_count(&receiver, BUSINESS).await.unwrap(), 0);
    assert_eq!(storage.get_last_issued_at(&receiver, BUSINESS).await.unwrap(), None);
}

pub async fn check_set_code_resets_errors(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("reset");
    storage
        .set_code(&receiver, BUSINESS, "111111", Duration::from_secs(60))
        .await
        .unwrap();
    storage.increase_errors(&receiver, BUSINESS).await.unwrap();
    storage.increase_errors(&receiver, BUSINESS).await.unwrap();
    assert_eq!(
        storage
            .get_effective_code(&receiver, BUSINESS)
            .await
            .unwrap()
            .map(|c| c.error_count),
        Some(2)
    );

    storage
        .set_code(&receiver, BUSINESS, "222222", Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(
        storage.get_effective_code(&receiver, BUSINESS).await.unwrap(),
        Some(EffectiveCode {
            code: "222222".to_string(),
            error_count: 0
        })
    );
}

pub async fn check_increments_are_noops_when_absent(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("noop");
    storage.increase_errors(&receiver, BUSINESS).await.unwrap();
    storage.increase_sent_count(&receiver, BUSINESS).await.unwrap();

    assert_eq!(storage.get_effective_code(&receiver, BUSINESS).await.unwrap(), None);
    assert_eq!(storage.get_sent_count(&receiver, BUSINESS).await.unwrap(), 0);
}

pub async fn check_quota_window(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("quota");
    storage
        .set_quota_window(&receiver, BUSINESS, Some(Duration::from_millis(400)))
        .await
        .unwrap();
    storage.increase_sent_count(&receiver, BUSINESS).await.unwrap();
    assert_eq!(storage.get_sent_count(&receiver, BUSINESS).await.unwrap(), 2);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(storage.get_sent_count(&receiver, BUSINESS).await.unwrap(), 0);
    storage.increase_sent_count(&receiver, BUSINESS).await.unwrap();
    assert_eq!(storage.get_sent_count(&receiver, BUSINESS).await.unwrap(), 0);
}

pub async fn check_lifetime_quota(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("lifetime");
    storage.set_quota_window(&receiver, BUSINESS, None).await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    storage.increase_sent_count(&receiver, BUSINESS).await.unwrap();
    assert_eq!(storage.get_sent_count(&receiver, BUSINESS).await.unwrap(), 2);

    storage.clear_session(&receiver, BUSINESS).await.unwrap();
}

pub async fn check_code_expiry(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("expiry");
    storage
        .set_code(&receiver, BUSINESS, "123456", Duration::from_millis(400))
        .await
        .unwrap();
    assert!(storage.get_last_issued_at(&receiver, BUSINESS).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(storage.get_effective_code(&receiver, BUSINESS).await.unwrap(), None);
    assert_eq!(storage.get_last_issued_at(&receiver, BUSINESS).await.unwrap(), None);

    // Expired codes do not come back through an increment
    storage.increase_errors(&receiver, BUSINESS).await.unwrap();
    assert_eq!(storage.get_effective_code(&receiver, BUSINESS).await.unwrap(), None);
}

pub async fn check_last_issued_at(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("issued");
    let before = Utc::now() - chrono::Duration::seconds(1);
    storage
        .set_code(&receiver, BUSINESS, "123456", Duration::from_secs(60))
        .await
        .unwrap();
    let after = Utc::now() + chrono::Duration::seconds(1);

    let issued_at = storage
        .get_last_issued_at(&receiver, BUSINESS)
        .await
        .unwrap()
        .unwrap();
    assert!(issued_at >= before && issued_at <= after);
}

pub async fn check_clear_session(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("clear");
    storage
        .set_code(&receiver, BUSINESS, "123456", Duration::from_secs(60))
        .await
        .unwrap();
    storage
        .set_quota_window(&receiver, BUSINESS, Some(Duration::from_secs(60)))
        .await
        .unwrap();

    storage.clear_session(&receiver, BUSINESS).await.unwrap();
    assert_eq!(storage.get_effective_code(&receiver, BUSINESS).await.unwrap(), None);
    assert_eq!(storage.get_sent_count(&receiver, BUSINESS).await.unwrap(), 0);

    // Clearing twice is harmless
    storage.clear_session(&receiver, BUSINESS).await.unwrap();
}

pub async fn check_sessions_are_isolated(storage: &dyn CodeStorage) {
    let receiver = unique_receiver("isolated");
    storage
        .set_code(&receiver, "login", "111111", Duration::from_secs(60))
        .await
        .unwrap();
    storage
        .set_code(&receiver, "login:extra", "222222", Duration::from_secs(60))
        .await
        .unwrap();
    storage
        .set_quota_window(&receiver, "login", None)
        .await
        .unwrap();

    assert_eq!(
        storage
            .get_effective_code(&receiver, "login")
            .await
            .unwrap()
            .map(|c| c.code),
        Some("111111".to_string())
    );
    assert_eq!(
        storage
            .get_effective_code(&receiver, "login:extra")
            .await
            .unwrap()
            .map(|c| c.code),
        Some("222222".to_string())
    );
    assert_eq!(storage.get_sent_count(&receiver, "login:extra").await.unwrap(), 0);

    storage.clear_session(&receiver, "login").await.unwrap();
    assert!(storage
        .get_effective_code(&receiver, "login:extra")
        .await
        .unwrap()
        .is_some());
    storage.clear_session(&receiver, "login:extra").await.unwrap();
}

pub async fn check_concurrent_increments(storage: Arc<dyn CodeStorage>) {
    let receiver = unique_receiver("concurrent");
    storage
        .set_code(&receiver, BUSINESS, "123456", Duration::from_secs(60))
        .await
        .unwrap();
    storage
        .set_quota_window(&receiver, BUSINESS, Some(Duration::from_secs(60)))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let storage = storage.clone();
        let receiver = receiver.clone();
        handles.push(tokio::spawn(async move {
            storage.increase_errors(&receiver, BUSINESS).await.unwrap();
            storage.increase_sent_count(&receiver, BUSINESS).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let record = storage
        .get_effective_code(&receiver, BUSINESS)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.error_count, 20);
    assert_eq!(storage.get_sent_count(&receiver, BUSINESS).await.unwrap(), 21);

    storage.clear_session(&receiver, BUSINESS).await.unwrap();
}

/// Run every check against one backend
pub async fn run_conformance_suite(storage: Arc<dyn CodeStorage>) {
    check_set_and_get_code(storage.as_ref()).await;
    check_absent_session(storage.as_ref()).await;
    check_set_code_resets_errors(storage.as_ref()).await;
    check_increments_are_noops_when_absent(storage.as_ref()).await;
    check_quota_window(storage.as_ref()).await;
    check_lifetime_quota(storage.as_ref()).await;
    check_code_expiry(storage.as_ref()).await;
    check_last_issued_at(storage.as_ref()).await;
    check_clear_session(storage.as_ref()).await;
    check_sessions_are_isolated(storage.as_ref()).await;
    check_concurrent_increments(storage).await;
}
