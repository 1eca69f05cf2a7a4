use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

use thinkr_api_server::config::Settings;
use thinkr_api_server::handlers;
use thinkr_api_server::history::FileHistoryStore;
use thinkr_api_server::services::{ChatModel, Classifier, GeminiService, ImageService};
use thinkr_api_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,thinkr_api_server=debug".to_string()),
        )
        .with_target(true)
        .init();

    info!("Starting Thinkr chat server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("Configuration loaded");

    // Initialize services
    let history = Arc::new(FileHistoryStore::new(
        &settings.history.file_path,
        settings.history.max_entries,
    ));
    let chat_model: Arc<dyn ChatModel> = Arc::new(GeminiService::new(settings.gemini.clone()));
    let classifier = Arc::new(Classifier::new(&settings.intent)?);
    let image_service = Arc::new(ImageService::new(settings.image.base_url.clone()));
    let assistant_name = Arc::new(parking_lot::RwLock::new(settings.assistant.name.clone()));

    let state = AppState {
        settings: settings.clone(),
        history,
        chat_model,
        classifier,
        image_service,
        assistant_name,
    };

    let app = build_router(state);

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::ui::home_handler))
        .route("/health", get(handlers::health::health_check))
        .route("/ask", post(handlers::chat::ask_handler))
        .route("/ask_with_image", post(handlers::chat::ask_with_image_handler))
        .route("/generate-image-api", post(handlers::image::generate_image_handler))
        .route("/history", get(handlers::history::get_history_handler))
        .route("/delete-history", post(handlers::history::delete_history_handler))
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        // Body limit (image uploads - max 10MB)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
