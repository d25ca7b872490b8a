//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the target URL can be probed over IPv6
//! - Validate value ranges (timeouts > 0, token length, port)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProbeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ProbeConfig;

/// Minimum accepted length of the auth token.
pub const MIN_TOKEN_LEN: usize = 16;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("TARGET_URL is required")]
    MissingTargetUrl,

    #[error("TARGET_URL is not a valid absolute URL ({0})")]
    InvalidTargetUrl(String),

    #[error("TARGET_URL scheme must be http or https, got {0}")]
    UnsupportedScheme(String),

    #[error("TARGET_URL has no host")]
    MissingHost,

    #[error("TARGET_URL host {0} is an IPv4 literal; replicas are discovered over IPv6 only")]
    Ipv4Target(String),

    #[error("AUTH_TOKEN is required")]
    MissingAuthToken,

    #[error("AUTH_TOKEN must be at least {min} characters, got {actual}")]
    AuthTokenTooShort { min: usize, actual: usize },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.target.parse() {
        errors.push(e);
    }

    let token_len = config.auth.token.chars().count();
    if token_len == 0 {
        errors.push(ValidationError::MissingAuthToken);
    } else if token_len < MIN_TOKEN_LEN {
        errors.push(ValidationError::AuthTokenTooShort {
            min: MIN_TOKEN_LEN,
            actual: token_len,
        });
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::Zero("listener.port"));
    }
    if config.timeouts.resolve_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.resolve_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.probe.body_limit == 0 {
        errors.push(ValidationError::Zero("probe.body_limit"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
