//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration, applying command-line overrides
//! - Install the metrics recorder when enabled
//! - Build the server (plugins load here, before any traffic)
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: bind and metrics errors are fatal
//! - Plugin failures are not: they are logged and the server still starts
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::validation::validate_config;
use crate::config::{load_config, ConfigError, ServerConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::plugin::PluginRegistry;

/// Fatal startup and serving errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Values given on the command line. Each one set wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub static_root: Option<PathBuf>,
    pub debug: bool,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(root) = self.static_root {
            config.pages.static_root = root;
        }
        if self.debug {
            config.debug = true;
        }
        config
    }
}

/// Load the config file (or defaults), apply overrides, then validate the
/// merged result.
pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<ServerConfig, StartupError> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    let config = overrides.apply(config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Bind the configured address and serve until SIGINT/SIGTERM.
pub async fn run(config: ServerConfig, registry: PluginRegistry) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, &registry);

    for failed in server.report().failed() {
        tracing::warn!(plugin = %failed.info.name, "Starting without plugin");
    }

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    server
        .run(listener, server_shutdown)
        .await
        .map_err(StartupError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file_or_overrides() {
        let config = load(None, ConfigOverrides::default()).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.pages.static_root, PathBuf::from("static"));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            debug = false

            [listener]
            bind_address = "127.0.0.1:7000"

            [pages]
            static_root = "from-file"
            "#
        )
        .unwrap();

        let overrides = ConfigOverrides {
            bind: Some("127.0.0.1:7001".into()),
            static_root: Some(PathBuf::from("from-cli")),
            debug: true,
        };
        let config = load(Some(file.path()), overrides).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:7001");
        assert_eq!(config.pages.static_root, PathBuf::from("from-cli"));
        assert!(config.debug);
    }

    #[test]
    fn test_unset_overrides_keep_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debug = false").unwrap();

        let config = load(Some(file.path()), ConfigOverrides::default()).unwrap();
        assert!(!config.debug);
    }

    #[test]
    fn test_invalid_override_is_a_config_error() {
        let overrides = ConfigOverrides {
            bind: Some("not-an-address".into()),
            ..Default::default()
        };
        let err = load(None, overrides).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = load(Some(Path::new("/no/such/plugin-host.toml")), ConfigOverrides::default())
            .unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Io { .. })));
    }
}
