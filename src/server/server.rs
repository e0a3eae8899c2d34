use anyhow::{Context, Result};
use std::time::Duration;

use axum::{
    extract::State,
    http::Method,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[cfg(feature = "slowdown")]
use super::slowdown_request;
use super::{
    catalogue_routes::catalogue_routes,
    errors::{method_not_allowed, not_found},
    log_requests,
    state::*,
    ServerConfig,
};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
struct SystemInfo {
    pub environment: String,
    pub version: String,
    pub uptime: String,
}

#[derive(Serialize)]
struct HealthCheck {
    pub status: String,
    pub system_info: SystemInfo,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn healthcheck(State(state): State<ServerState>) -> impl IntoResponse {
    Json(HealthCheck {
        status: "available".to_string(),
        system_info: SystemInfo {
            environment: state.config.env.clone(),
            version: API_VERSION.to_string(),
            uptime: format_uptime(state.start_time.elapsed()),
        },
    })
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

pub fn make_app(config: ServerConfig, catalogue_store: GuardedCatalogueStore) -> Router {
    let state = ServerState::new(config, catalogue_store);

    let v1_routes: Router = Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(catalogue_routes())
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state.clone());

    let app: Router = Router::new()
        .nest("/v1", v1_routes)
        .fallback(not_found)
        .layer(cors_layer());

    #[cfg(feature = "slowdown")]
    let app = app.layer(middleware::from_fn(slowdown_request));

    app.layer(middleware::from_fn_with_state(state, log_requests))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

pub async fn run_server(config: ServerConfig, catalogue_store: GuardedCatalogueStore) -> Result<()> {
    let port = config.port;
    let env = config.env.clone();
    let app = make_app(config, catalogue_store);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Starting {} server on port {}", env, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}
