// src/server/connection_loop.rs

//! Contains the main server loop that supervises background tasks and handles
//! signals and graceful shutdown.

use super::context::{LogReloadHandle, ServerContext};
use crate::config::Config;
use anyhow::{Result, anyhow};
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{error, info, warn};
use tracing_subscriber::filter::EnvFilter;

/// Runs until SIGINT or SIGTERM, or until a background task fails.
pub async fn run(mut ctx: ServerContext) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow!("Failed to register SIGINT handler: {}", e))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow!("Failed to register SIGTERM handler: {}", e))?;
    let mut sighup = signal(SignalKind::hangup())
        .map_err(|e| anyhow!("Failed to register SIGHUP handler: {}", e))?;

    loop {
        tokio::select! {
            biased;

            _ = sigint.recv() => {
                info!("SIGINT received, initiating graceful shutdown.");
                break;
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, initiating graceful shutdown.");
                break;
            }
            _ = sighup.recv() => {
                reload_log_level(&ctx.log_reload_handle, ctx.config_path.as_deref());
            }

            Some(res) = ctx.background_tasks.join_next() => {
                match res {
                    Ok(Ok(())) => warn!("A background task finished unexpectedly without an error."),
                    Ok(Err(e)) => { error!("CRITICAL: Background task failed: {}. Shutting down.", e); break; }
                    Err(e) => { error!("CRITICAL: Background task panicked: {e:?}. Shutting down."); break; }
                }
            },
        }
    }

    info!("Shutting down. Sending signal to all tasks.");
    if ctx.shutdown_tx.send(()).is_err() {
        warn!("No task was listening for the shutdown signal.");
    }

    info!("Waiting for background tasks to finish...");
    if tokio::time::timeout(Duration::from_secs(10), async {
        while ctx.background_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for background tasks to finish cleanly.");
    };
    info!("Server shutdown complete.");
    Ok(())
}

/// Re-reads `log_level` from the configuration file and applies it.
fn reload_log_level(handle: &LogReloadHandle, config_path: Option<&str>) {
    let Some(path) = config_path else {
        warn!("SIGHUP received, but the server was started without a configuration file.");
        return;
    };
    match Config::from_file(path) {
        Ok(config) => match handle.reload(EnvFilter::new(&config.log_level)) {
            Ok(()) => info!("SIGHUP received, log level set to '{}'.", config.log_level),
            Err(e) => error!("Failed to apply log level '{}': {}", config.log_level, e),
        },
        Err(e) => warn!("SIGHUP received, but '{}' could not be reloaded: {:#}", path, e),
    }
}
