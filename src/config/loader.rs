//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RiskConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
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

/// Build the effective configuration: optional file, then environment, then validation.
pub fn resolve_config(path: Option<&Path>) -> Result<RiskConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => RiskConfig::default(),
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay the deployment environment variables onto `config`.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut RiskConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(port) = var("PORT") {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port.trim());
    }
    if let Some(origins) = var("CORS_ORIGIN") {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(key) = var("HELIUS_API_KEY") {
        config.helius.api_key = key;
    }
    if let Some(key) = var("GOPLUS_APP_KEY") {
        config.goplus.app_key = key;
    }
    if let Some(secret) = var("GOPLUS_APP_SECRET") {
        config.goplus.app_secret = secret;
    }
    if let Some(file) = var("SQLITE_FILE") {
        config.storage.sqlite_file = file;
    }
    if let Some(level) = var("LOG_LEVEL") {
        config.observability.log_level = level;
    }
}
