use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flowsmith_api::{build_router, config::Config, state::AppState};
use flowsmith_graph::Engine;
use flowsmith_llm::ClientFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Flowsmith API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize chat client and engine
    tracing::info!(model = %config.llm.model, "Initializing LLM client");
    let chat_client = ClientFactory::create_chat_client(config.provider())?;

    let engine = Engine::builder()
        .chat_client(chat_client, (&config.llm).into())
        .config(config.engine.clone())
        .build()?;

    tracing::info!(
        max_visits = config.engine.max_visits,
        max_iterations = config.engine.max_iterations,
        "Engine ready"
    );

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), engine));

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
