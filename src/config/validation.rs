//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, capacity > 0)
//! - Check that paired credentials are configured together
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RiskConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RiskConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field}: '{value}' is not a socket address")]
    BindAddress { field: &'static str, value: String },

    #[error("invalid {field}: '{value}' is not a URL")]
    Url { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("goplus.app_key and goplus.app_secret must be set together")]
    PartialCredentials,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RiskConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BindAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for (field, value) in [
        ("helius.base_url", &config.helius.base_url),
        ("goplus.base_url", &config.goplus.base_url),
    ] {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::Url { field, value: value.clone() });
        }
    }

    let positives: [(&'static str, u64); 7] = [
        ("cache.max_entries", config.cache.max_entries as u64),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
        ("helius.cache_ttl_secs", config.helius.cache_ttl_secs),
        ("goplus.token_ttl_secs", config.goplus.token_ttl_secs),
        ("goplus.report_ttl_secs", config.goplus.report_ttl_secs),
        ("security.max_body_size", config.security.max_body_size as u64),
    ];
    for (field, value) in positives {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_window == 0 {
            errors.push(ValidationError::Zero("rate_limit.requests_per_window"));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::Zero("rate_limit.window_secs"));
        }
    }

    if config.goplus.app_key.is_empty() != config.goplus.app_secret.is_empty() {
        errors.push(ValidationError::PartialCredentials);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RiskConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = RiskConfig::default();
        config.listener.bind_address = "nowhere".to_string();
        config.cache.max_entries = 0;
        config.goplus.app_key = "key-only".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Zero("cache.max_entries")));
        assert!(errors.contains(&ValidationError::PartialCredentials));
    }

    #[test]
    fn test_rate_limit_checked_only_when_enabled() {
        let mut config = RiskConfig::default();
        config.rate_limit.window_secs = 0;
        assert!(validate_config(&config).is_err());

        config.rate_limit.enabled = false;
        assert!(validate_config(&config).is_ok());
    }
}
