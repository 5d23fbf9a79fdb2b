//! Message content rendering
//!
//! Senders that deliver human-readable messages turn a code into text through a
//! [`ContentFormatter`]. [`TemplateFormatter`] renders the templates configured per flow.

mod template;

#[cfg(test)]
mod tests;

use std::time::Duration;

use crate::errors::ConfigError;

pub use template::{display_ttl, TemplateFormatter};

/// Renders the content delivered to a receiver
pub trait ContentFormatter: Send + Sync {
    fn render(
        &self,
        receiver: &str,
        business: &str,
        code: &str,
        ttl: Duration,
        sender: Option<&str>,
    ) -> Result<String, ConfigError>;
}

/// Formatter backed by a closure, for flows that build content in code
pub struct FnFormatter<F> {
    render: F,
}

impl<F> FnFormatter<F>
where
    F: Fn(&str, &str, &str, Duration, Option<&str>) -> String + Send + Sync,
{
    pub fn new(render: F) -> Self {
        Self { render }
    }
}

impl<F> ContentFormatter for FnFormatter<F>
where
    F: Fn(&str, &str, &str, Duration, Option<&str>) -> String + Send + Sync,
{
    fn render(
        &self,
        receiver: &str,
        business: &str,
        code: &str,
        ttl: Duration,
        sender: Option<&str>,
    ) -> Result<String, ConfigError> {
        Ok((self.render)(receiver, business, code, ttl, sender))
    }
}
