mod career;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod orchestrator;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::career::CareerServices;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::ModelInvoker;
use crate::orchestrator::RequestTracker;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryResultStore, PgResultStore, ResultStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing API keys)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career API v{}", env!("CARGO_PKG_VERSION"));

    // Model candidates: every model crossed with every key, model-major
    let invoker = ModelInvoker::from_config(&config)?;
    info!(
        candidates = invoker.candidates().len(),
        models = ?config.gemini_models,
        "Model invoker initialized"
    );

    // Result store: PostgreSQL when configured, process memory otherwise
    let store: Arc<dyn ResultStore> = match &config.database_url {
        Some(url) => Arc::new(PgResultStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; results are kept in memory only");
            Arc::new(MemoryResultStore::new())
        }
    };

    let state = AppState {
        services: CareerServices::new(invoker),
        store,
        tracker: RequestTracker::new(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the dashboard host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
