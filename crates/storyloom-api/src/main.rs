//! Storyloom API server entry point.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use storyloom_api::config::AppConfig;
use storyloom_api::error::AppError;
use storyloom_api::state::AppState;
use storyloom_content::domain::story_data::StoryData;
use storyloom_core::clock::SystemClock;
use storyloom_core::rng::{DeterministicRng, SystemRng};
use storyloom_generator::HttpGenerator;
use storyloom_story::application::manager::SessionManager;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Storyloom API server");

    let config = AppConfig::from_env()?;
    let story_data = StoryData::load(&config.story_data_path)?;
    story_data.setting(&config.setting)?;

    // Build application state.
    let backend = Arc::new(HttpGenerator::new(config.generator_url.clone()));
    tracing::info!(endpoint = backend.endpoint(), "using generation backend");
    let manager = Arc::new(SessionManager::new(
        config.engine.clone(),
        backend,
        Arc::new(SystemClock),
    ));
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(SystemRng::from_os()));
    let app_state = AppState::new(
        manager,
        Arc::new(story_data),
        rng,
        config.setting.as_str(),
    );

    if config.preload {
        match app_state.start_curated_story().await {
            Ok(_) => tracing::info!("preloaded opening story"),
            Err(e) => tracing::warn!(error = %e, "preload failed, starting without a story"),
        }
    }

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = storyloom_api::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
