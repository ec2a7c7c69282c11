// src/server/initialization.rs

//! Handles the server initialization process, from configuration checks to
//! state setup and binding the listener.

use super::context::{LogReloadHandle, ServerContext};
use crate::config::Config;
use crate::core::AppState;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Initializes all server components before starting the main loop.
pub async fn setup(
    config: Config,
    config_path: Option<String>,
    log_reload_handle: LogReloadHandle,
) -> Result<ServerContext> {
    log_startup_info(&config);
    let (shutdown_tx, _) = broadcast::channel(1);

    let (host, port) = (config.host.clone(), config.port);
    let state = AppState::initialize(config)?;

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    info!("Larder GraphQL endpoint listening on http://{}:{}/graphql", host, port);

    Ok(ServerContext {
        state,
        listener: Some(listener),
        shutdown_tx,
        background_tasks: JoinSet::new(),
        log_reload_handle,
        config_path,
    })
}

/// Logs key configuration parameters at startup.
fn log_startup_info(config: &Config) {
    info!("Upstream recipe search at {}.", config.upstream.search_url);
    match config.cache.page_ttl() {
        Some(ttl) => info!("Search pages are cached for {} seconds.", ttl.as_secs()),
        None => warn!("Search pages are cached without expiry. Cache memory is unbounded."),
    }
    match config.cache.recipe_ttl() {
        Some(ttl) => info!("Recipes are cached for {} seconds.", ttl.as_secs()),
        None => warn!("Recipes are cached without expiry."),
    }
    info!(
        "Tag pages hold {} recipes; pages above {} are rejected; batch fetches run {} requests at a time.",
        config.pagination.tag_page_size, config.pagination.max_page, config.recipes.fetch_concurrency
    );
}
