//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the plugin host.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, timeouts).
    pub listener: ListenerConfig,

    /// Landing page and static asset settings.
    pub pages: PagesConfig,

    /// Session signing settings.
    pub session: SessionConfig,

    /// Which compiled-in plugins get loaded.
    pub plugins: PluginsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Verbose error reporting: panic messages are returned to the client
    /// and the default log filter drops to `debug`.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            pages: PagesConfig::default(),
            session: SessionConfig::default(),
            plugins: PluginsConfig::default(),
            observability: ObservabilityConfig::default(),
            debug: true,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Landing page and static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Directory whose files are served verbatim.
    pub static_root: PathBuf,

    /// URL prefix the static root is mounted under.
    pub static_url_path: String,

    /// HTML file served on `/` and `/index`.
    pub index_file: PathBuf,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            static_root: PathBuf::from("static"),
            static_url_path: "/static".to_string(),
            index_file: PathBuf::from("templates/index.html"),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Secret used to sign session cookies.
    pub secret_key: String,
}

/// Secret shipped in the default config. Fine for local development only.
pub const DEV_SECRET_KEY: &str = "dev-secret-change-me";

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_key: DEV_SECRET_KEY.to_string(),
        }
    }
}

/// Plugin selection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// When set, only plugins named here are loaded.
    pub enabled: Option<Vec<String>>,

    /// Plugins that are never loaded.
    pub exclude: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
