//! Deployment environment and logging settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variable naming the deployment environment
pub const ENVIRONMENT_VAR: &str = "CHECKCODE_ENV";

/// Deployment stage
///
/// Picks the `.env.{stage}` file, the `checkcode.{stage}.toml` file and the logging
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "stage", alias = "test")]
    Staging,
    #[serde(alias = "prod")]
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Read [`ENVIRONMENT_VAR`] from the process environment
    pub fn detect() -> Self {
        Self::detect_with(|name| std::env::var(name).ok())
    }

    /// Resolve the stage through `lookup`; unset or unknown values mean development
    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        lookup(ENVIRONMENT_VAR)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn config_file(&self) -> String {
        format!("checkcode.{}.toml", self.as_str())
    }

    pub fn env_file(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment '{}'", other)),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
        }
    }
}

/// Tracing subscriber settings
///
/// `level` accepts any `EnvFilter` directive such as `info,cc_core=debug`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// ANSI colors, ignored by the json format
    pub ansi: bool,
    /// Add file and line of each event
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl LoggingConfig {
    /// Verbose colored output in development, json elsewhere
    pub fn for_environment(environment: Environment) -> Self {
        let (level, format) = match environment {
            Environment::Development => ("debug", LogFormat::Pretty),
            Environment::Staging => ("info", LogFormat::Json),
            Environment::Production => ("warn", LogFormat::Json),
        };
        let development = environment == Environment::Development;
        Self {
            level: level.to_string(),
            format,
            ansi: development,
            source_location: development,
        }
    }
}
