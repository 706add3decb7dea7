//! Blog Manager
//!
//! A single-user blog post manager: a server-rendered page for writing, editing, deleting and
//! tag-filtering posts, with the post list persisted under one key of a SQLite key-value table.

mod api;
mod config;
mod errors;
mod models;
mod render;
mod storage;
mod store;
mod ui;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use render::{ConfiguredFormatter, TimestampFormatter};
use store::{HydrateOutcome, PostStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<PostStore>>,
    pub formatter: Arc<dyn TimestampFormatter>,
}

impl AppState {
    pub fn new(store: PostStore, formatter: Arc<dyn TimestampFormatter>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            formatter,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Blog Manager");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Storage key: {}", config.storage_key);
    tracing::info!("Bind address: {}", config.bind_addr);

    let formatter = ConfiguredFormatter::new(config.time_format.clone(), config.utc_offset_minutes)?;

    // Open the backing store and read saved posts
    let backend = storage::open_store(&config.db_path).await?;
    let (store, outcome) =
        PostStore::load(backend, config.storage_key.clone(), config.strict_load).await?;

    match outcome {
        HydrateOutcome::Empty => tracing::info!("No saved posts; starting empty"),
        HydrateOutcome::Loaded(count) => tracing::info!("Loaded {} posts", count),
        HydrateOutcome::Recovered { reason } => tracing::warn!(
            "Saved posts were unreadable and have been set aside under {}: {}",
            store.backup_key(),
            reason
        ),
    }

    let state = AppState::new(store, Arc::new(formatter));

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration, JSON API only
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api::router().layer(cors))
        .merge(ui::router())
        .merge(health_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
