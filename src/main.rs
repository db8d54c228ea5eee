//! irclogd - IRC gateway that relays UDP datagrams and named pipes into
//! channels.

use irclogd::config::{Config, validate};
use irclogd::network::Gateway;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "irclogd.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before tracing so `server.debug` can pick the level
    let explicit_path = std::env::args().nth(1);
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let (config, missing_default) =
        if explicit_path.is_none() && !Path::new(&config_path).exists() {
            (Config::default(), true)
        } else {
            (Config::load(&config_path)?, false)
        };

    // Initialize tracing
    let default_level = if config.server.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .init();

    if missing_default {
        warn!(path = %config_path, "Config file not found, using built-in defaults");
    }

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        "Starting irclogd"
    );

    let gateway = Gateway::bind(&config).await?;

    tokio::select! {
        result = gateway.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}
