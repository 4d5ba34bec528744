mod config;
mod db;
mod handlers;
mod lifecycle;
mod models;
mod postgrest;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::get,
};
use config::{Config, LifecyclePolicy};
use db::RoomStore;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    pub store: Arc<dyn RoomStore>,
    pub policy: LifecyclePolicy,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomcode=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Fail before opening any connection if configuration is incomplete
    let config = Config::from_env().context("Invalid configuration")?;

    let store = db::connect(&config.backend).await?;

    let state = Arc::new(AppState {
        store,
        policy: config.policy,
    });

    let app = app(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/health/db", get(handlers::database_health))
        .route("/lobby/:code", get(handlers::handle_lobby))
        .route(
            "/cleanup-rooms",
            get(handlers::handle_cleanup).post(handlers::handle_cleanup),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
