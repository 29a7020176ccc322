//! Trade Analytics Dashboard - Dataset Server
//!
//! Loads the trade CSV once at startup and serves the aggregation, profile
//! and matching queries of the analytics core over HTTP.

use axum::{routing::get, Router};
use shared::{MatchEngine, TradeRepository};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod extract;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use services::DatasetService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Normalized dataset; replaced wholesale on reload
    pub dataset: Arc<RwLock<TradeRepository>>,
    pub matcher: MatchEngine,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tad_server=debug,shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Trade Analytics Dataset Server");
    tracing::info!("Environment: {}", config.environment);

    // Load the dataset; the server still starts without one so it can be
    // reloaded once the file is in place
    tracing::info!("Loading dataset from {}...", config.dataset.path);
    let repository = match DatasetService::new(config.dataset.clone()).load().await {
        Ok(repository) => repository,
        Err(e) => {
            tracing::warn!("Starting with an empty dataset: {}", e);
            TradeRepository::default()
        }
    };

    // Create application state
    let state = AppState {
        dataset: Arc::new(RwLock::new(repository)),
        matcher: MatchEngine::with_config(config.matching),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Trade Analytics Dashboard API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
