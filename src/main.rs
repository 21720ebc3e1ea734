//! Bounded chat - a turn-limited chatbot with PDF transcripts
//!
//! Each thread accepts five user messages, answered by a Gemini model. The
//! fifth message gets a fixed farewell and the transcript can be downloaded
//! as a PDF.

mod api;
mod config;
mod llm;
mod report;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use config::ServerConfig;
use llm::{LlmConfig, ModelRegistry};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; real environment variables still apply
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bounded_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    let server_config = ServerConfig::from_env();

    // Initialize LLM registry
    let llm_config = LlmConfig::from_env();
    let llm_registry = Arc::new(ModelRegistry::new(&llm_config));

    if llm_registry.has_models() {
        tracing::info!(
            models = ?llm_registry.available_models(),
            default = %llm_registry.default_model_id(),
            "LLM registry initialized"
        );
    } else {
        tracing::warn!("No LLM API keys configured. Set GEMINI_API_KEY or LLM_GATEWAY.");
    }

    let state = AppState::new(llm_registry);
    tracing::info!(model = %state.sessions.model_id(), "Conversation graph ready");
    runtime::spawn_idle_sweeper(Arc::clone(&state.sessions), server_config.thread_ttl);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    let addr = server_config.addr();
    tracing::info!("Bounded chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
