//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{LogFormat, ProbeConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },

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

/// Load configuration from an optional TOML file, overlay the process
/// environment, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ProbeConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProbeConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay values from `lookup` (normally the process environment).
///
/// Empty values are ignored.
pub fn apply_env<F>(config: &mut ProbeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(url) = get("TARGET_URL") {
        config.target.url = url;
    }
    if let Some(token) = get("AUTH_TOKEN") {
        config.auth.token = token;
    }
    if let Some(port) = get("PORT") {
        config.listener.port = port
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key: "PORT", value: port })?;
    }
    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(format) = get("LOG_FORMAT") {
        config.observability.log_format = match format.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => return Err(ConfigError::InvalidEnv { key: "LOG_FORMAT", value: format }),
        };
    }
    if let Some(addr) = get("METRICS_ADDRESS") {
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = addr;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn env_overrides_defaults() {
        let vars = env(&[
            ("TARGET_URL", "http://svc.internal:8000/ping"),
            ("AUTH_TOKEN", "abcdEFGH12345678"),
            ("PORT", "9000"),
            ("LOG_FORMAT", "JSON"),
        ]);
        let mut config = ProbeConfig::default();
        apply_env(&mut config, |k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.target.url, "http://svc.internal:8000/ping");
        assert_eq!(config.auth.token, "abcdEFGH12345678");
        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(!config.observability.metrics_enabled);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_port_keeps_default() {
        let vars = env(&[("PORT", "")]);
        let mut config = ProbeConfig::default();
        apply_env(&mut config, |k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.listener.port, 8080);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let vars = env(&[("PORT", "eighty")]);
        let mut config = ProbeConfig::default();
        let err = apply_env(&mut config, |k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "PORT", .. }));
    }

    #[test]
    fn validation_error_lists_every_problem() {
        let err = ConfigError::Validation(vec![
            ValidationError::MissingTargetUrl,
            ValidationError::MissingAuthToken,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: TARGET_URL is required, AUTH_TOKEN is required"
        );
    }
}
