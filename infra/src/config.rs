//! Layered configuration loading
//!
//! Sources, lowest precedence first:
//! 1. defaults of [`AppConfig`], with logging defaults of the deployment stage
//! 2. an optional configuration file (format picked from its extension)
//! 3. `CHECKCODE_*` environment variables, nested with `__`, e.g.
//!    `CHECKCODE_STORAGE__BACKEND=redis` or `CHECKCODE_FLOW__FLOWS__SMS_LOGIN__MAX_SENDS=5`
//!
//! `.env` files are read into the process environment first and never override
//! variables that are already set. Keys are matched case-insensitively, so flow keys
//! and sender identities should be lowercase.

use std::path::Path;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment as EnvironmentSource, File};

use cc_shared::config::{AppConfig, Environment, LoggingConfig};

use crate::InfrastructureError;

/// Prefix of environment variables read by [`load_app_config`]
pub const ENV_PREFIX: &str = "CHECKCODE";

/// Load `.env.{stage}` and then `.env` from `dir` when present
pub fn load_env_files(environment: Environment, dir: &Path) {
    for name in [environment.env_file(), ".env".to_string()] {
        let path = dir.join(&name);
        if dotenvy::from_path(&path).is_ok() {
            tracing::debug!(file = %path.display(), "Loaded environment file");
        }
    }
}

/// Build the application configuration from an optional file and the environment
pub fn load_app_config(path: Option<&Path>) -> Result<AppConfig, InfrastructureError> {
    build(Config::builder(), path)
}

/// Load the configuration of `environment` from `dir`
///
/// Reads the stage's `.env` files and `checkcode.{stage}.toml` when present. Logging
/// falls back to the stage defaults of [`LoggingConfig::for_environment`].
pub fn load_environment_config(
    environment: Environment,
    dir: &Path,
) -> Result<AppConfig, InfrastructureError> {
    load_env_files(environment, dir);

    let logging = LoggingConfig::for_environment(environment);
    let builder = Config::builder()
        .set_default("environment", environment.as_str())?
        .set_default("logging.level", logging.level)?
        .set_default("logging.format", logging.format.as_str())?
        .set_default("logging.ansi", logging.ansi)?
        .set_default("logging.source_location", logging.source_location)?;

    let file = dir.join(environment.config_file());
    let mut config = build(builder, file.exists().then_some(file.as_path()))?;
    config.environment = environment;
    Ok(config)
}

/// Load the configuration of the stage named by `CHECKCODE_ENV` from the working directory
pub fn load_for_environment() -> Result<AppConfig, InfrastructureError> {
    load_environment_config(Environment::detect(), Path::new("."))
}

fn build(
    mut builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> Result<AppConfig, InfrastructureError> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(InfrastructureError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        builder = builder.add_source(File::from(path));
    }

    builder = builder.add_source(
        EnvironmentSource::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config: AppConfig = builder.build()?.try_deserialize()?;

    tracing::info!(
        environment = %config.environment,
        backend = ?config.storage.backend,
        flows = config.flow.flows.len(),
        "Configuration loaded"
    );
    Ok(config)
}
