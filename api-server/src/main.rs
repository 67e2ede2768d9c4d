//! FlowGuard HTTP Server
//!
//! Serves the two-stage flow classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     FLOWGUARD SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌──────────────────┐  │
//! │  │  Router   │  │ DecisionPipeline │  │  Audit writer    │  │
//! │  │  (Axum)   │─►│ (flowguard-core) │─►│  (queue + task)  │  │
//! │  └───────────┘  └────────┬─────────┘  └────────┬─────────┘  │
//! │                          ▼                     ▼            │
//! │                   ┌─────────────┐      ┌──────────────┐     │
//! │                   │ model dir   │      │ traffic log  │     │
//! │                   └─────────────┘      └──────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod audit_queue;
mod config;
mod error;
mod handlers;
mod middleware;
mod models;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use flowguard_core::logic::audit::open_audit_log;
use flowguard_core::{AuditSink, DecisionPipeline, ModelBundle, ModelMetadata};
use tower::ServiceBuilder;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::audit_queue::QueuedAuditSink;
use crate::models::RequestStats;

pub use error::{AppError, AppResult};

const DEFAULT_LOG_FILTER: &str = "flowguard_server=debug,flowguard_core=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    init_tracing(&config);

    tracing::info!("FlowGuard server starting ({})", config.environment);
    tracing::info!("Model directory: {}", config.model_dir.display());

    // Load models once; no reload while serving
    let bundle = ModelBundle::load(&config.model_dir)
        .with_context(|| format!("failed to load models from {}", config.model_dir.display()))?;
    let model = Arc::new(bundle.metadata.clone());
    let pipeline = Arc::new(bundle.into_pipeline(config.threshold));

    // Audit log behind the write queue
    let audit_log = open_audit_log(&config.audit_log_path, config.audit_format, config.audit_max_entries)
        .with_context(|| format!("failed to open audit log {}", config.audit_log_path.display()))?;
    let (audit, audit_writer) = QueuedAuditSink::spawn(audit_log, config.audit_queue_capacity);

    // Build application state
    let state = AppState {
        pipeline,
        model,
        audit: Arc::new(audit),
        stats: Arc::new(RequestStats::default()),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Router (and every queue sender) is gone; let the writer drain
    if tokio::time::timeout(Duration::from_secs(5), audit_writer).await.is_err() {
        tracing::warn!("Audit writer did not finish draining in time");
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DecisionPipeline>,
    pub model: Arc<ModelMetadata>,
    pub audit: Arc<dyn AuditSink>,
    pub stats: Arc<RequestStats>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index::page))
        .route("/submit", post(handlers::submit::submit))
        .route("/health", get(handlers::health::check))
        .route("/api/v1/model", get(handlers::status::model_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any)
                ),
        )
        .with_state(state)
}
