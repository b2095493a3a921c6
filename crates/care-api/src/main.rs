//! Healthcare assistant server: chat page, /chat/send, /chat/history, /chat/clear.

use care_api::{config::ServerConfig, server};
use care_llm::OpenAiGenerator;
use care_triage::HealthcareAssistant;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let generator = OpenAiGenerator::from_env();
    match &generator {
        Some(g) => tracing::info!(model = %g.model(), "response generator configured"),
        None => tracing::warn!("LLM_API_KEY not set; contextual questions will get a fallback reply"),
    }
    let assistant = HealthcareAssistant::new(generator);
    tracing::info!(contextual = assistant.has_generator(), "assistant ready");
    let assistant: Arc<dyn care_types::ChatAssistant + Send + Sync> = Arc::new(assistant);
    let sessions = config.session_store()?;
    tracing::info!(history = ?config.history, "session store ready");

    let state = Arc::new(server::AppState {
        assistant,
        sessions,
    });
    let app = server::router(state);
    tracing::info!("Healthcare assistant listening on {}", config.listen);
    axum::serve(
        tokio::net::TcpListener::bind(config.listen).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
