//! Composite key addressing one `(sender identity, business flag)` flow.

use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

/// Separator between the sender identity and the business flag
pub const FLOW_KEY_DELIMITER: char = '_';

/// A parsed flow key such as `sms_login`
///
/// Parsing splits on the first delimiter, so the business flag may itself contain
/// the delimiter while the sender identity may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowKey {
    sender: String,
    business: String,
}

impl FlowKey {
    pub fn new(sender: impl Into<String>, business: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            business: business.into(),
        }
    }

    /// Join a sender identity and a business flag into a composite key
    pub fn join(sender: &str, business: &str) -> String {
        format!("{}{}{}", sender, FLOW_KEY_DELIMITER, business)
    }

    /// Split a composite key on the first delimiter
    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        match key.split_once(FLOW_KEY_DELIMITER) {
            Some((sender, business)) if !sender.is_empty() && !business.is_empty() => {
                Ok(Self::new(sender, business))
            }
            _ => Err(ConfigError::InvalidFlowKey {
                key: key.to_string(),
            }),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn business(&self) -> &str {
        &self.business
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.sender, FLOW_KEY_DELIMITER, self.business)
    }
}

impl FromStr for FlowKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let cases = [
            ("sms", "login"),
            ("email", "reset-password"),
            ("none", "captcha"),
            ("sms", "bind_phone"),
            ("x", "y"),
        ];
        for (sender, business) in cases {
            let joined = FlowKey::join(sender, business);
            let parsed = FlowKey::parse(&joined).unwrap();
            assert_eq!(parsed.sender(), sender);
            assert_eq!(parsed.business(), business);
            assert_eq!(parsed.to_string(), joined);
        }
    }

    #[test]
    fn test_splits_on_first_delimiter() {
        let key: FlowKey = "sms_bind_phone_v2".parse().unwrap();
        assert_eq!(key.sender(), "sms");
        assert_eq!(key.business(), "bind_phone_v2");
    }

    #[test]
    fn test_rejects_malformed_keys() {
        for key in ["login", "_login", "sms_", "", "_"] {
            assert_eq!(
                FlowKey::parse(key),
                Err(ConfigError::InvalidFlowKey {
                    key: key.to_string()
                })
            );
        }
    }
}
