// src/server/context.rs

use crate::core::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing_subscriber::{filter::EnvFilter, reload};

pub type LogReloadHandle = Arc<reload::Handle<EnvFilter, tracing_subscriber::Registry>>;

/// Holds all the initialized state required to run the server's main loop.
pub struct ServerContext {
    pub state: Arc<AppState>,
    /// Taken by the HTTP server task when it is spawned.
    pub listener: Option<TcpListener>,
    pub shutdown_tx: broadcast::Sender<()>,
    pub background_tasks: JoinSet<Result<(), anyhow::Error>>,
    pub log_reload_handle: LogReloadHandle,
    /// The file the configuration was loaded from, re-read on SIGHUP.
    pub config_path: Option<String>,
}
