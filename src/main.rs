use std::path::PathBuf;

use clap::Parser;

use plugin_host::config::schema::DEV_SECRET_KEY;
use plugin_host::lifecycle::{self, ConfigOverrides};
use plugin_host::observability::logging;
use plugin_host::PluginRegistry;

#[derive(Parser)]
#[command(name = "plugin-host")]
#[command(about = "Landing page and static file server with compiled-in plugins", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override pages.static_root
    #[arg(long)]
    static_root: Option<PathBuf>,

    /// Force verbose error reporting on
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind: cli.bind,
        static_root: cli.static_root,
        debug: cli.debug,
    };
    let config = lifecycle::load(cli.config.as_deref(), overrides)?;

    logging::init_logging(&config.observability, config.debug);
    tracing::info!("plugin-host v{} starting", env!("CARGO_PKG_VERSION"));

    if !config.debug && config.session.secret_key == DEV_SECRET_KEY {
        tracing::warn!("Using the built-in development secret key outside debug mode");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        static_root = %config.pages.static_root.display(),
        debug = config.debug,
        "Configuration loaded"
    );

    lifecycle::run(config, PluginRegistry::builtin()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
