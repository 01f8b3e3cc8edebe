pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::cache::RenderCache;
use crate::services::render::{PageRenderer, PdfiumRenderer};
use crate::services::sessions::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub cache: Arc<RenderCache>,
}

impl AppState {
    pub fn new(config: Config, renderer: Arc<dyn PageRenderer>) -> Self {
        let cache = RenderCache::new(renderer, config.render_cache_capacity);
        let sessions = SessionStore::new(config.session_ttl, &config.dpi);
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            cache: Arc::new(cache),
        }
    }
}

/// Build the full router.
pub fn app(state: AppState) -> Router {
    let max_upload = state.config.max_upload_bytes;

    // Session-scoped routes
    let session_routes = Router::new()
        // Deck routes
        .route("/api/deck", get(routes::study::view))
        .route("/api/deck/next", post(routes::study::next))
        .route("/api/deck/reveal", post(routes::study::reveal))
        .route("/api/deck/reset", post(routes::study::reset))
        // Document routes
        .route(
            "/api/document",
            post(routes::document::upload).layer(DefaultBodyLimit::max(max_upload)),
        )
        // Card image routes
        .route("/api/card/:side", get(routes::card::image))
        // Settings routes
        .route(
            "/api/settings",
            get(routes::settings::get).put(routes::settings::update),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::session::session_middleware,
        ));

    Router::new()
        .route("/", get(routes::index::page))
        .route("/health", get(health_check))
        .route("/api/session", post(routes::session::create))
        .merge(session_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    match &config.pdfium_lib_path {
        Some(path) => tracing::info!("Using pdfium library at {}", path.display()),
        None => tracing::info!("Using system pdfium library"),
    }
    let renderer = Arc::new(PdfiumRenderer::new(config.pdfium_lib_path.clone()));

    let addr = config.addr();
    let state = AppState::new(config, renderer);
    let app = app(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
