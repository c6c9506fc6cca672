//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject static mounts that would collide with the landing page
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// Paths owned by the landing page.
const PAGE_PATHS: [&str; 2] = ["/", "/index"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("listener.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("pages.static_url_path `{0}` must start with `/`, not end with `/`, and not shadow the landing page")]
    StaticUrlPath(String),

    #[error("session.secret_key must not be empty")]
    EmptySecret,

    #[error("plugins.{0} contains an empty plugin name")]
    EmptyPluginName(&'static str),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let prefix = config.pages.static_url_path.as_str();
    if !prefix.starts_with('/') || prefix.ends_with('/') || PAGE_PATHS.contains(&prefix) {
        errors.push(ValidationError::StaticUrlPath(prefix.to_string()));
    }

    if config.session.secret_key.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }

    if config.plugins.exclude.iter().any(|n| n.trim().is_empty()) {
        errors.push(ValidationError::EmptyPluginName("exclude"));
    }

    if let Some(enabled) = &config.plugins.enabled {
        if enabled.iter().any(|n| n.trim().is_empty()) {
            errors.push(ValidationError::EmptyPluginName("enabled"));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
