// src/main.rs

//! The main entry point for the Larder server application.

use anyhow::Result;
use larder::config::Config;
use larder::server;
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{filter::EnvFilter, prelude::*, reload};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    run_app().await
}

async fn run_app() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("Larder version {VERSION}");
        return Ok(());
    }

    // An explicit --config must load; the default path is optional.
    let explicit_path = args
        .iter()
        .position(|arg| arg == "--config")
        .map(|i| match args.get(i + 1) {
            Some(path) => path.clone(),
            None => {
                eprintln!("--config flag requires a value");
                std::process::exit(1);
            }
        });
    let config_path = explicit_path
        .or_else(|| Path::new(DEFAULT_CONFIG_PATH).exists().then(|| DEFAULT_CONFIG_PATH.to_string()));

    let mut config = match config_path.as_deref() {
        Some(path) => match Config::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load configuration from \"{path}\": {e:#}");
                std::process::exit(1);
            }
        },
        None => {
            let mut cfg = Config::default();
            cfg.apply_env_overrides();
            cfg
        }
    };

    // Override port if provided as a command-line argument
    if let Some(port_index) = args.iter().position(|arg| arg == "--port") {
        if let Some(port_str) = args.get(port_index + 1) {
            match port_str.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => {
                    eprintln!("Invalid port number: {port_str}");
                    std::process::exit(1);
                }
            }
        } else {
            eprintln!("--port flag requires a value");
            std::process::exit(1);
        }
    }

    // Setup logging with reloading capabilities.
    // Get initial log level from env var or config.
    let initial_log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    let (filter, reload_handle) = reload::Layer::new(EnvFilter::new(initial_log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true),
        )
        .init();

    if config_path.is_none() {
        warn!("No configuration file found at '{DEFAULT_CONFIG_PATH}'. Using built-in defaults.");
    }
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {:#}", e);
        return Err(e);
    }
    info!("Starting Larder {VERSION}.");

    let reload_handle = Arc::new(reload_handle);

    if let Err(e) = server::run(config, config_path, reload_handle).await {
        error!("Server runtime error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
