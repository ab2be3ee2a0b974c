//! Coworking service
//!
//! Reads configuration from TOML (`~/.config/coworking-service/config.toml`
//! or `$COWORKING_CONFIG`) and serves the REST API until SIGINT/SIGTERM.

use tracing::{error, info};

use coworking::config::AppConfig;
use coworking::default_config_path;
use coworking::server::{init_tracing, ServerHandle, ServerOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = default_config_path();
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        ..ServerOptions::default()
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}
