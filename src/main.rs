//! Compost Readiness Predictor
//!
//! Serves `POST /predict`: sensor readings in, predicted days until the
//! compost is ready out.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  COMPOST PREDICTOR                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────────────────────────────┐   │
//! │  │  API      │   │  Readiness Predictor              │   │
//! │  │  (Axum)   │──▶│  scaler → encoder → train columns │   │
//! │  └───────────┘   │  → regressor                      │   │
//! │                  └─────────────────┬─────────────────┘   │
//! │                                    ▲ loaded once         │
//! │                  ┌─────────────────┴─────────────────┐   │
//! │                  │  model / scaler / encoder /       │   │
//! │                  │  train_columns  (.json)           │   │
//! │                  └───────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod constants;
mod error;
mod handlers;
mod models;
mod predictor;

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::post, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::AppResult;

use predictor::{ArtifactPaths, ReadinessPredictor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (.env first so RUST_LOG can come from it)
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "compost_predictor=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Compost Predictor v{} starting...", constants::APP_VERSION);
    tracing::info!("Artifacts: {}", config.artifact_dir.display());

    let paths = ArtifactPaths::in_dir(&config.artifact_dir);
    let predictor = ReadinessPredictor::load(&paths, &config.default_material_type)
        .context("Failed to load model artifacts")?;
    tracing::debug!("Train columns: {:?}", predictor.columns().names());

    let addr = config.socket_addr()
        .with_context(|| format!("Invalid HOST '{}'", config.host))?;

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<ReadinessPredictor>,
}

/// Create the router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict::predict))
        // Router::layer wraps outward, so this yields the order
        // Cors -> Trace -> Compression (outermost first).
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
