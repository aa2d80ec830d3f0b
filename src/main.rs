use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use concierge::config::AppConfig;
use concierge::db;
use concierge::handlers;
use concierge::services::ai::ollama::OllamaProvider;
use concierge::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(
        !config.admin_password.is_empty(),
        "ADMIN_PASSWORD must not be empty"
    );

    let conn = db::init_db(&config.database_url)?;

    tracing::info!(
        url = %config.ollama_url,
        model = %config.ollama_model,
        "using Ollama for document answers"
    );
    let llm = OllamaProvider::new(config.ollama_url.clone(), config.ollama_model.clone());

    let state = Arc::new(AppState::new(conn, config.clone(), Box::new(llm)));
    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
