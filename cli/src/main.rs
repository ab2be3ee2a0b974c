//! Coworking service: CLI server
//!
//! Headless room booking API for systemd units, containers or a plain shell.
//!
//! ```sh
//! # Default config (~/.config/coworking-service/config.toml)
//! coworking-server
//!
//! # Custom config and port
//! coworking-server --config /etc/coworking/config.toml --port 8080
//!
//! # Validate config without starting
//! coworking-server --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use coworking::config::{AppConfig, CONFIG_ENV};
use coworking::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "coworking-server",
    version,
    about = "REST API for coworking room bookings",
    long_about = "Coworking service: room registry, conflict-free bookings, \
                  availability and pricing over a REST API.\n\n\
                  Default config: ~/.config/coworking-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(coworking::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
    }

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!("   Log format  : {}", config.logging.format);
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
