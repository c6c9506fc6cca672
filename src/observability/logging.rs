//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, debug mode and `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` overrides anything in the config file

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directives when `RUST_LOG` is not set.
pub fn default_directives(config: &ObservabilityConfig, debug: bool) -> String {
    let level = if debug { "debug" } else { config.log_level.as_str() };
    format!("plugin_host={level},tower_http={level}")
}

/// Install the global tracing subscriber. Calling it twice is harmless.
pub fn init_logging(config: &ObservabilityConfig, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config, debug)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
