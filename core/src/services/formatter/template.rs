//! Placeholder templates configured per flow

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use cc_shared::config::{FlowSettings, TimeDisplay};

use crate::domain::FlowKey;
use crate::errors::ConfigError;

use super::ContentFormatter;

// Known placeholders; anything else in braces is left as written
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(receiver|business|code|ttl|sender)\}").unwrap()
});

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;

/// Render a code lifetime as the number shown in message content
///
/// `Auto` picks hours or minutes when the lifetime divides evenly, seconds otherwise.
/// `Minutes` and `Hours` may produce fractions, rounded to two decimals.
pub fn display_ttl(ttl: Duration, display: TimeDisplay) -> String {
    let seconds = ttl.as_secs();
    match display {
        TimeDisplay::Seconds => seconds.to_string(),
        TimeDisplay::Minutes => fractional(ttl.as_secs_f64() / SECONDS_PER_MINUTE as f64),
        TimeDisplay::Hours => fractional(ttl.as_secs_f64() / SECONDS_PER_HOUR as f64),
        TimeDisplay::Auto => {
            if seconds >= SECONDS_PER_HOUR && seconds % SECONDS_PER_HOUR == 0 {
                (seconds / SECONDS_PER_HOUR).to_string()
            } else if seconds >= SECONDS_PER_MINUTE && seconds % SECONDS_PER_MINUTE == 0 {
                (seconds / SECONDS_PER_MINUTE).to_string()
            } else {
                seconds.to_string()
            }
        }
    }
}

fn fractional(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

/// Templates keyed by flow, with `{receiver}`, `{business}`, `{code}`, `{ttl}` and
/// `{sender}` placeholders
pub struct TemplateFormatter {
    templates: RwLock<HashMap<FlowKey, String>>,
    time_display: TimeDisplay,
}

impl TemplateFormatter {
    pub fn new(time_display: TimeDisplay) -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
            time_display,
        }
    }

    /// Collect the template of every configured flow
    pub fn from_settings(settings: &FlowSettings) -> Result<Self, ConfigError> {
        let formatter = Self::new(settings.time_display);
        for (key, policy) in &settings.flows {
            if let Some(template) = &policy.template {
                let flow = FlowKey::parse(key)?;
                formatter.set_template(flow.sender(), flow.business(), template.clone());
            }
        }
        Ok(formatter)
    }

    pub fn time_display(&self) -> TimeDisplay {
        self.time_display
    }

    /// Register or replace the template of a flow
    pub fn set_template(&self, sender: &str, business: &str, template: impl Into<String>) {
        let mut templates = self.templates.write().unwrap_or_else(|p| p.into_inner());
        templates.insert(FlowKey::new(sender, business), template.into());
    }

    /// Remove the template of a flow, returning it
    pub fn remove_template(&self, sender: &str, business: &str) -> Option<String> {
        let mut templates = self.templates.write().unwrap_or_else(|p| p.into_inner());
        templates.remove(&FlowKey::new(sender, business))
    }

    pub fn has_template(&self, sender: &str, business: &str) -> bool {
        let templates = self.templates.read().unwrap_or_else(|p| p.into_inner());
        templates.contains_key(&FlowKey::new(sender, business))
    }
}

impl ContentFormatter for TemplateFormatter {
    fn render(
        &self,
        receiver: &str,
        business: &str,
        code: &str,
        ttl: Duration,
        sender: Option<&str>,
    ) -> Result<String, ConfigError> {
        let sender = sender.unwrap_or_default();
        let templates = self.templates.read().unwrap_or_else(|p| p.into_inner());
        let template = templates
            .get(&FlowKey::new(sender, business))
            .ok_or_else(|| ConfigError::MissingTemplate {
                sender: sender.to_string(),
                business: business.to_string(),
            })?;

        let ttl = display_ttl(ttl, self.time_display);
        let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "receiver" => receiver,
            "business" => business,
            "code" => code,
            "ttl" => ttl.as_str(),
            _ => sender,
        });
        Ok(rendered.into_owned())
    }
}
