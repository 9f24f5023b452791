mod config;
mod credentials;
mod errors;
mod feedback;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::feedback::session::SessionRegistry;
use crate::llm_client::{FeedbackModel, GeminiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Writing Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Load the persisted API key
    let credentials =
        CredentialStore::load(&config.credential_file, config.gemini_api_key.clone()).await?;

    // Initialize LLM client
    let gemini = GeminiClient::new(
        config.gemini_base_url.clone(),
        config.gemini_model.clone(),
        Duration::from_secs(config.gemini_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", gemini.model_name());

    let state = AppState {
        model: Arc::new(gemini),
        credentials,
        sessions: Arc::new(SessionRegistry::new()),
    };

    // Browser front end is served from another origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
