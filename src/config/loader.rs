//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{AppConfig, DEFAULT_PORT};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides (`PORT`) to a loaded configuration.
pub fn apply_env_overrides(config: &mut AppConfig) {
    let raw = std::env::var("PORT").ok();
    config.listener.port = port_from_env(raw.as_deref(), config.listener.port);
}

/// Resolve the listening port from a raw `PORT` value.
///
/// Missing, unparsable or zero values fall back to `configured`, and a
/// zero `configured` port falls back to [`DEFAULT_PORT`].
pub fn port_from_env(raw: Option<&str>, configured: u16) -> u16 {
    let fallback = if configured == 0 { DEFAULT_PORT } else { configured };
    match raw.map(str::trim) {
        None | Some("") => fallback,
        Some(value) => match value.parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => {
                tracing::warn!(value = %value, fallback, "Ignoring unparsable PORT");
                fallback
            }
        },
    }
}
