//! Lifepath API server entry point.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use lifepath_api::error::AppError;
use lifepath_api::routes;
use lifepath_api::state::AppState;
use lifepath_catalog::ScenarioCatalog;
use lifepath_core::clock::SystemClock;
use lifepath_core::rng::SystemRng;
use lifepath_store::PgSimulationStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Lifepath API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
    let catalog_path =
        std::env::var("CATALOG_PATH").unwrap_or_else(|_| "content/catalog.yaml".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Load and validate the scenario catalog before anything can run
    // against it.
    let source = std::fs::read_to_string(&catalog_path)
        .map_err(|e| AppError::Config(format!("failed to read catalog '{catalog_path}': {e}")))?;
    let catalog = ScenarioCatalog::from_yaml_str(&source)
        .map_err(|e| AppError::Config(format!("invalid catalog '{catalog_path}': {e}")))?;
    tracing::info!(version = %catalog.version_hash(), "catalog loaded");

    // Create database connection pool and ensure the snapshot schema.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    let store = Arc::new(PgSimulationStore::new(pool));
    store.ensure_schema().await?;

    // Build application state.
    let app_state = AppState::new(
        Arc::new(catalog),
        Arc::new(SystemClock),
        Arc::new(Mutex::new(SystemRng)),
        store.clone(),
        store,
    );

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest(
            "/api/v1/simulations",
            routes::simulation::router().merge(routes::results::router()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
