// src/server/http.rs

//! The HTTP router: the GraphQL endpoint plus health and Prometheus metrics.

use super::graphql::{LarderSchema, build_schema};
use crate::core::caller::{Caller, Role};
use crate::core::metrics::{self, gather_metrics};
use crate::core::{AppState, LarderError};
use anyhow::Result;
use async_graphql::{ErrorExtensions, Pos};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Header carrying the authenticated user id, set by the authentication middleware.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's role. Absent means a regular user.
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Clone)]
struct HttpState {
    app: Arc<AppState>,
    schema: LarderSchema,
}

pub fn router(state: Arc<AppState>) -> Router {
    let schema = build_schema(state.clone());
    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(HttpState { app: state, schema })
}

/// Reads the caller identity from the trusted headers.
///
/// A missing or blank user id yields `None`; an unknown role is an input error.
pub fn caller_from_headers(headers: &HeaderMap) -> Result<Option<Caller>, LarderError> {
    let Some(user_id) = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };
    let role = match headers.get(USER_ROLE_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| LarderError::InvalidInput("Malformed role header".to_string()))?
            .parse::<Role>()?,
        None => Role::User,
    };
    Ok(Some(Caller::new(user_id, role)))
}

async fn graphql_handler(
    State(http): State<HttpState>,
    headers: HeaderMap,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let timer = metrics::REQUEST_LATENCY_SECONDS.start_timer();
    let response = match caller_from_headers(&headers) {
        Ok(Some(caller)) => {
            debug!("GraphQL request from user '{}'.", caller.user_id);
            http.schema.execute(request.data(caller)).await
        }
        Ok(None) => http.schema.execute(request).await,
        Err(e) => async_graphql::Response::from_errors(vec![
            e.extend().into_server_error(Pos::default()),
        ]),
    };
    timer.observe_duration();
    Json(response)
}

async fn health_handler(State(http): State<HttpState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "cached_keys": http.app.store.len(),
    }))
}

/// Handles HTTP requests to the /metrics endpoint.
///
/// Gauges are refreshed right before the registry is encoded.
async fn metrics_handler(State(http): State<HttpState>) -> impl IntoResponse {
    metrics::CACHED_KEYS.set(http.app.store.len() as f64);

    let body = gather_metrics();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        body,
    )
}

/// Serves the router on `listener` until a shutdown signal arrives.
pub async fn run_http_server(
    state: Arc<AppState>,
    listener: TcpListener,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.recv().await.ok();
            info!("HTTP server shutting down.");
        })
        .await?;
    Ok(())
}
