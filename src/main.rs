use axum::{
    extract::Extension,
    routing::{get, get_service, post},
    Router,
};
use std::sync::Arc;
use tera::Tera;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::EnvFilter;

mod config;
mod data;
mod features;
mod handlers;
mod utils;

#[cfg(test)]
mod testing;

use config::Config;
use features::gemini::{GeminiClient, GenerativeModel};
use handlers::{quiz, relay, study};

/// Shared handler state: the upstream model behind the relay
#[derive(Clone)]
pub struct AppState<M> {
    pub model: M,
}

pub fn build_router<M: GenerativeModel>(model: M, templates: Arc<Tera>, config: &Config) -> Router {
    let state = AppState { model };

    // Sessions configuration
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            config.session_inactivity_hours,
        )))
        .with_secure(false);

    // Relay API router
    let api_router = Router::new()
        .route("/gemini", post(relay::relay::<M>))
        .with_state(state.clone());

    // Study list router
    let study_router = Router::new()
        .route("/process", post(study::process::<M>))
        .route("/clear", post(study::clear))
        .route("/export", get(study::export))
        .route("/audio", get(study::speak::<M>))
        .route("/{index}/{feature}", post(study::generate_feature::<M>))
        .with_state(state);

    let quiz_router = Router::new()
        .route("/start", post(quiz::start))
        .route("/answer", post(quiz::answer))
        .route("/next", post(quiz::next));

    Router::new()
        .route("/", get(study::index))
        .route("/mode", post(study::set_mode))
        .nest("/study", study_router)
        .nest("/quiz", quiz_router)
        .nest("/api", api_router)
        // Static files
        .nest_service("/static", get_service(ServeDir::new(&config.static_dir)))
        // Shared state and layers
        .layer(Extension(templates))
        .layer(session_layer)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("najdi_study=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.gemini_api_key.is_none() {
        log::warn!("GEMINI_API_KEY is not set; the relay will answer with a server error");
    }

    let model = GeminiClient::new(&config)?;

    // Templates configuration
    let templates = Tera::new(&config.templates_glob).map_err(|e| {
        log::error!("Template parsing error: {}", e);
        e
    })?;

    let app = build_router(model, Arc::new(templates), &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    log::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
