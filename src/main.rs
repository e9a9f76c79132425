//! Army of Me AI Service - Character art helpers for a fantasy game
//!
//! A stateless HTTP service that:
//! - Generates fantasy names with a text model
//! - Rewrites short prompts into detailed image prompts
//! - Renders images, alone or as matching portrait and full-body pairs
//!
//! All model work is delegated to Cloudflare Workers AI.

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

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
                .unwrap_or_else(|_| "armyofme_ai=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Army of Me AI Service");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Workers AI: {}", config.workers_ai_base_url);
    tracing::info!("  Name model: {}", config.name_generation_model);
    tracing::info!("  Enhancer model: {}", config.prompt_enhancer_model);
    tracing::info!("  Image model: {}", config.image_generation_model);
    tracing::info!("  Image-to-image model: {}", config.image_to_image_model);
    tracing::info!("  Allowed origin: {}", config.allowed_origin);
    tracing::info!("  Upstream retries: {}", config.upstream_max_retries);

    let port = config.server_port;

    // Initialize application state
    let state = Arc::new(AppState::new(config)?);
    tracing::info!("Application state initialized");

    let app = http::create_app(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}
