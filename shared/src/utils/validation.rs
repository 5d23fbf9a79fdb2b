//! Receiver validation and log masking

use once_cell::sync::Lazy;
use regex::Regex;

use super::phone::{is_valid_phone, mask_phone_number};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").unwrap()
});

/// Check if an email address is valid
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Mask an email address for display (e.g., a***@example.com)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

/// Mask any receiver before it is written to logs
pub fn mask_receiver(receiver: &str) -> String {
    if receiver.contains('@') {
        mask_email(receiver)
    } else if is_valid_phone(receiver) {
        mask_phone_number(receiver)
    } else {
        let visible: String = receiver.chars().take(2).collect();
        format!("{}***", visible)
    }
}
