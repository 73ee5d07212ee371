//! # shelfwise-server
//!
//! HTTP API for shelfwise: row normalization, slot scoring, and shelf and
//! product management.

mod error;
mod routes;

use anyhow::Context;
use axum::routing::{delete, get, post};
use axum::Router;
use shelfwise_core::Config;
use shelfwise_normalize::ViewOptions;
use shelfwise_store::{JsonFileRepository, MemoryRepository, Repository, ShelfService};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Boxed so the storage backend can be picked from configuration.
pub type Store = ShelfService<Box<dyn Repository>>;

/// Shared by every request.
pub struct AppState {
    pub config: Config,
    pub views: ViewOptions,
    pub store: RwLock<Store>,
}

impl AppState {
    pub fn new(config: Config, repo: Box<dyn Repository>) -> Self {
        AppState {
            config,
            views: ViewOptions::default(),
            store: RwLock::new(ShelfService::new(repo)),
        }
    }

    /// State backed by the configured storage directory, or memory.
    fn from_config(config: Config) -> anyhow::Result<Self> {
        let repo: Box<dyn Repository> = match &config.storage.dir {
            Some(dir) => Box::new(
                JsonFileRepository::open(dir)
                    .with_context(|| format!("Failed to open store at {}", dir.display()))?,
            ),
            None => {
                tracing::warn!("storage.dir not set; records are kept in memory");
                Box::new(MemoryRepository::new())
            }
        };
        Ok(Self::new(config, repo))
    }
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/normalize", post(routes::normalize))
        .route("/slots", post(routes::slots))
        .route("/shelves", get(routes::list_shelves).post(routes::create_shelf))
        .route(
            "/shelves/:id",
            get(routes::get_shelf).delete(routes::delete_shelf),
        )
        .route("/shelves/:id/placements", post(routes::place_product))
        .route(
            "/shelves/:id/placements/:position",
            delete(routes::remove_placement),
        )
        .route(
            "/products",
            get(routes::list_products).post(routes::save_product),
        )
        .route("/products/:id", delete(routes::delete_product))
        .route("/users", get(routes::list_users))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn load_config() -> anyhow::Result<Config> {
    let config = match std::env::var_os("SHELFWISE_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            Config::load(&path).with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    let state = Arc::new(AppState::from_config(config)?);
    let app = create_router(state);

    let addr = std::env::var("SHELFWISE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    tracing::info!("shelfwise-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
