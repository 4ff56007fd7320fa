//! RPSLS Engine - Rock, Paper, Scissors, Lizard, Spock game service
//!
//! The Engine is the backend server that:
//! - Decides rounds with the cyclic RPSLS rule table
//! - Draws the computer's choice from an external random number service,
//!   protected by retries, a circuit breaker and a local fallback
//! - Keeps the scoreboard of the current session in memory
//! - Serves the game over a REST API

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rpsls_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RPSLS Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    let random = &config.random_source;
    tracing::info!("Configuration loaded");
    tracing::info!("  Random service: {}", random.base_url);
    tracing::info!(
        "  Timeout: {:?}, retries: {}",
        random.timeout,
        random.retry_count
    );
    tracing::info!(
        "  Circuit breaker: {} failures, open for {:?}",
        random.breaker_failure_threshold,
        random.breaker_open_duration
    );
    if random.fallback_enabled {
        tracing::info!(
            "  Fallback: {}..={}",
            random.fallback_min,
            random.fallback_max
        );
    } else {
        tracing::info!("  Fallback: disabled");
    }

    // Initialize application state
    let state = AppState::new(&config).await?;
    let state = Arc::new(state);
    tracing::info!("Application state initialized");
    let shutdown_state = state.clone();

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        // Merge REST API routes
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server until Ctrl+C, then let in-flight requests finish cancelled
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received, cancelling in-flight rounds");
        shutdown_state.shutdown.cancel();
    });

    if let Err(e) = server.await {
        tracing::error!("Server error: {}", e);
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "Healthy",
        "timestamp": Utc::now(),
        "randomSourceCircuit": state.random_source.circuit_state().as_str(),
    }))
}
