//! Unit tests for content formatting

use std::time::Duration;

use cc_shared::config::{FlowPolicy, FlowSettings, TimeDisplay};

use crate::errors::ConfigError;
use crate::services::formatter::{display_ttl, ContentFormatter, FnFormatter, TemplateFormatter};

#[test]
fn test_display_ttl_auto() {
    let auto = |secs| display_ttl(Duration::from_secs(secs), TimeDisplay::Auto);
    assert_eq!(auto(45), "45");
    assert_eq!(auto(60), "1");
    assert_eq!(auto(300), "5");
    assert_eq!(auto(90), "90");
    assert_eq!(auto(360), "6");
    assert_eq!(auto(3600), "1");
    assert_eq!(auto(7200), "2");
    assert_eq!(auto(5400), "90");
}

#[test]
fn test_display_ttl_fixed_units() {
    let ttl = Duration::from_secs(90);
    assert_eq!(display_ttl(ttl, TimeDisplay::Seconds), "90");
    assert_eq!(display_ttl(ttl, TimeDisplay::Minutes), "1.5");
    assert_eq!(display_ttl(Duration::from_secs(1800), TimeDisplay::Hours), "0.5");
    assert_eq!(display_ttl(Duration::from_secs(300), TimeDisplay::Minutes), "5");
    assert_eq!(display_ttl(Duration::from_secs(100), TimeDisplay::Minutes), "1.67");
}

#[test]
fn test_render_template() {
    let formatter = TemplateFormatter::new(TimeDisplay::Auto);
    formatter.set_template(
        "sms",
        "login",
        "[{sender}] Code {code} for {business}, valid {ttl} min. To: {receiver}",
    );

    let content = formatter
        .render("+8613800138000", "login", "482913", Duration::from_secs(300), Some("sms"))
        .unwrap();
    assert_eq!(content, "[sms] Code 482913 for login, valid 5 min. To: +8613800138000");
}

#[test]
fn test_missing_template() {
    let formatter = TemplateFormatter::new(TimeDisplay::Seconds);
    formatter.set_template("sms", "login", "{code}");

    let err = formatter
        .render("a@b.com", "login", "1", Duration::from_secs(60), Some("email"))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::MissingTemplate {
            sender: "email".to_string(),
            business: "login".to_string()
        }
    );

    assert_eq!(formatter.remove_template("sms", "login"), Some("{code}".to_string()));
    assert!(!formatter.has_template("sms", "login"));
}

#[test]
fn test_from_settings() {
    let settings = FlowSettings {
        time_display: TimeDisplay::Minutes,
        ..Default::default()
    }
    .with_flow(
        "email_reset_password",
        FlowPolicy {
            template: Some("Reset code {code}, expires in {ttl} minutes".to_string()),
            ..Default::default()
        },
    )
    .with_flow("sms_login", FlowPolicy::default());

    let formatter = TemplateFormatter::from_settings(&settings).unwrap();
    assert!(formatter.has_template("email", "reset_password"));
    assert!(!formatter.has_template("sms", "login"));

    let content = formatter
        .render("a@b.com", "reset_password", "9F3K", Duration::from_secs(600), Some("email"))
        .unwrap();
    assert_eq!(content, "Reset code 9F3K, expires in 10 minutes");
}

#[test]
fn test_from_settings_rejects_bad_key() {
    let settings = FlowSettings::default().with_flow(
        "login",
        FlowPolicy {
            template: Some("{code}".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(
        TemplateFormatter::from_settings(&settings),
        Err(ConfigError::InvalidFlowKey { .. })
    ));
}

#[test]
fn test_fn_formatter() {
    let formatter = FnFormatter::new(
        |receiver: &str, _business: &str, code: &str, ttl: Duration, _sender: Option<&str>| {
            format!("{}:{}:{}", receiver, code, ttl.as_secs())
        },
    );
    let content = formatter
        .render("bob", "login", "1234", Duration::from_secs(30), None)
        .unwrap();
    assert_eq!(content, "bob:1234:30");
}

#[test]
fn test_inserted_values_are_not_expanded_again() {
    let formatter = TemplateFormatter::new(TimeDisplay::Seconds);
    formatter.set_template("email", "login", "Hi {receiver}, code {code}");

    let rendered = formatter
        .render(
            "acct{ttl}",
            "login",
            "123456",
            Duration::from_secs(300),
            Some("email"),
        )
        .unwrap();
    assert_eq!(rendered, "Hi acct{ttl}, code 123456");

    let rendered = formatter
        .render("{code}", "login", "{sender}", Duration::from_secs(300), Some("email"))
        .unwrap();
    assert_eq!(rendered, "Hi {code}, code {sender}");
}

#[test]
fn test_unknown_placeholders_are_kept() {
    let formatter = TemplateFormatter::new(TimeDisplay::Seconds);
    formatter.set_template("sms", "login", "{greeting} {code} {code}");

    let rendered = formatter
        .render("alice", "login", "42", Duration::from_secs(60), Some("sms"))
        .unwrap();
    assert_eq!(rendered, "{greeting} 42 42");
}
