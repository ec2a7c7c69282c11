// src/server/spawner.rs

//! Spawns all of the server's long-running background tasks.

use super::context::ServerContext;
use super::http;
use crate::core::storage::ttl::TtlManager;
use anyhow::{Result, anyhow};
use tracing::info;

/// Spawns the HTTP server and the maintenance tasks into the context's JoinSet.
pub async fn spawn_all(ctx: &mut ServerContext) -> Result<()> {
    let state = &ctx.state;
    let shutdown_tx = &ctx.shutdown_tx;
    let background_tasks = &mut ctx.background_tasks;

    // --- HTTP Server ---
    let listener = ctx
        .listener
        .take()
        .ok_or_else(|| anyhow!("HTTP listener was already taken"))?;
    let http_state = state.clone();
    let shutdown_rx_http = shutdown_tx.subscribe();
    background_tasks.spawn(async move {
        http::run_http_server(http_state, listener, shutdown_rx_http).await
    });

    // --- Core Maintenance Tasks ---
    let ttl_manager = TtlManager::new(
        state.store.clone(),
        state.config.cache.ttl_sweep_interval(),
    );
    let shutdown_rx_ttl = shutdown_tx.subscribe();
    background_tasks.spawn(async move {
        ttl_manager.run(shutdown_rx_ttl).await;
        Ok(())
    });

    info!("All background tasks have been spawned.");
    Ok(())
}
