//! Screening API Server
//!
//! HTTP front end for the questionnaire screening model.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SCREENING API                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────────────────────────┐   │
//! │  │  Router   │  │  ModelService (screening-core)       │   │
//! │  │  (Axum)   │──▶  validate → encode → infer → map     │   │
//! │  └───────────┘  └──────────────────┬───────────────────┘   │
//! │                                    ▼                        │
//! │                        ┌──────────────────────┐            │
//! │                        │  models/ artifacts   │            │
//! │                        └──────────────────────┘            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, request::Parts},
    routing::{get, post},
    Router,
};
use screening_core::constants::APP_VERSION;
use screening_core::ModelService;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "screening_api=debug,screening_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Screening API {} starting ({})...", APP_VERSION, config.environment);
    tracing::info!("Model directory: {}", config.model_dir.display());
    if config.allow_reload && config.is_production() {
        tracing::warn!("ALLOW_RELOAD is enabled in production");
    }

    // Load the model before accepting traffic; failure leaves the service degraded
    let service = Arc::new(ModelService::new(config.artifact_settings(), APP_VERSION));
    let loader = service.clone();
    match tokio::task::spawn_blocking(move || loader.load(None)).await? {
        Ok(report) => tracing::info!(
            "Model ready: {} ({})",
            report.metadata.model_path,
            report.metadata.model_format
        ),
        Err(e) => tracing::warn!("Model failed to load, serving in degraded mode: {}", e),
    }

    // Build application state
    let state = AppState {
        service,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down gracefully"),
        _ = sigterm => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ModelService>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::health::check))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/questions", get(handlers::questions::list))
        .route("/model", get(handlers::model::info));

    let mut app = Router::new().merge(public_routes);

    if state.config.allow_reload {
        app = app.route("/admin/reload", post(handlers::admin::reload));
    }

    let cors_config = state.config.clone();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request: &Parts| {
                origin
                    .to_str()
                    .map(|o| cors_config.origin_allowed(o))
                    .unwrap_or(false)
            },
        ))
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
