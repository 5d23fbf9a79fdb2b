//! Configuration file loading

use std::io::Write;

use cc_infra::config::load_app_config;
use cc_infra::InfrastructureError;
use cc_shared::config::{Environment, StorageBackend, TimeDisplay};

const CONFIG: &str = r#"
environment = "staging"

[storage]
backend = "redis"

[storage.redis]
url = "redis://cache.internal:6379"
key_prefix = "otp"

[logging]
level = "info"
format = "json"

[flow]
time_display = "auto"
isolate_senders = true

[flow.flows.sms_login]
max_sends = 5
window_seconds = 1200
interval_seconds = 60
code_ttl_seconds = 300
max_errors = 3
template = "Your code is {code}, valid for {ttl} minutes"

[flow.flows.email_reset_password]
code_ttl_seconds = 600
max_errors = 5
"#;

#[test]
fn test_load_from_toml_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = load_app_config(Some(file.path())).unwrap();

    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.storage.backend, StorageBackend::Redis);
    assert_eq!(config.storage.redis.url, "redis://cache.internal:6379");
    assert_eq!(config.storage.redis.key_prefix, "otp");
    assert_eq!(config.storage.redis.max_retries, 3);
    assert_eq!(config.flow.time_display, TimeDisplay::Auto);
    assert!(config.flow.isolate_senders);

    let login = config.flow.policy("sms_login").unwrap();
    assert_eq!(login.max_sends, Some(5));
    assert_eq!(login.code_ttl_seconds, Some(300));
    assert_eq!(
        login.template.as_deref(),
        Some("Your code is {code}, valid for {ttl} minutes")
    );

    let reset = config.flow.policy("email_reset_password").unwrap();
    assert_eq!(reset.max_sends, None);
    assert_eq!(reset.max_errors, Some(5));
}

#[test]
fn test_defaults_without_file() {
    let config = load_app_config(None).unwrap();
    assert_eq!(config.storage.redis.key_prefix, "checkcode");
}

#[test]
fn test_missing_file_is_an_error() {
    let result = load_app_config(Some(std::path::Path::new("/nonexistent/checkcode.toml")));
    assert!(matches!(result, Err(InfrastructureError::Config(_))));
}

#[tokio::test]
async fn test_storage_and_tracing_from_loaded_config() {
    use std::sync::Arc;

    use cc_core::domain::SystemClock;
    use cc_core::services::CodeStorage;
    use cc_infra::cache::create_code_storage;
    use cc_infra::telemetry::init_tracing;

    let config = load_app_config(None).unwrap();
    assert_eq!(config.storage.backend, StorageBackend::Memory);

    init_tracing(&config.logging).unwrap();
    assert!(init_tracing(&config.logging).is_err());

    let storage = create_code_storage(&config.storage, Arc::new(SystemClock))
        .await
        .unwrap();
    assert!(storage
        .set_code("alice", "login", "123456", std::time::Duration::from_secs(60))
        .await
        .unwrap());
    assert_eq!(
        storage
            .get_effective_code("alice", "login")
            .await
            .unwrap()
            .map(|active| active.code),
        Some("123456".to_string())
    );
}
