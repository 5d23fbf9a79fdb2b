//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Mainland China mobile phone number regex
static CHINA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^1[3-9]\d{9}$").unwrap()
});

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{1,14}$").unwrap()
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is valid (mainland mobile)
pub fn is_valid_chinese_mobile(phone: &str) -> bool {
    CHINA_MOBILE_REGEX.is_match(&normalize_phone_number(phone))
}

/// Check if a phone number is valid (international E.164 format)
pub fn is_valid_international_phone(phone: &str) -> bool {
    INTERNATIONAL_PHONE_REGEX.is_match(&normalize_phone_number(phone))
}

/// Check if a phone number is valid (either mainland mobile or international)
///
/// Only digits, `+`, spaces, dashes and parentheses may appear in the raw input.
pub fn is_valid_phone(phone: &str) -> bool {
    let formatting_only = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    formatting_only && (is_valid_chinese_mobile(phone) || is_valid_international_phone(phone))
}

/// Mask a phone number for display (e.g., 138****5678)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
