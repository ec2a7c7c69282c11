// src/server/mod.rs

use crate::config::Config;
use anyhow::Result;

mod connection_loop;
mod context;
pub mod graphql;
pub mod http;
mod initialization;
mod spawner;

pub use context::LogReloadHandle;

/// The main server startup function, orchestrating all setup phases.
pub async fn run(
    config: Config,
    config_path: Option<String>,
    log_reload_handle: LogReloadHandle,
) -> Result<()> {
    // 1. Initialize application state and the listener.
    let mut server_context =
        initialization::setup(config, config_path, log_reload_handle).await?;

    // 2. Spawn the HTTP server and background tasks.
    spawner::spawn_all(&mut server_context).await?;

    // 3. Supervise until shutdown.
    connection_loop::run(server_context).await
}
